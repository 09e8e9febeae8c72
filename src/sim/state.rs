//! World state
//!
//! The `World` owns everything the simulation mutates: the active stage,
//! the player, enemy and coin arenas, the camera and shared animations.
//! Collaborators (renderer, audio, HUD) read it and drain its event queue.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::AnimTimer;
use super::camera::Camera;
use super::coin::Coin;
use super::enemy::Enemy;
use super::player::Player;
use super::stage::{LoadError, SpawnKind, Stage, StageSource};
use super::tick::TickInput;

/// Camera smoothing (1 = locked to the player)
pub const CAMERA_LERP: f32 = 1.0;
/// Default presentation viewport in screen pixels
pub const VIEWPORT: Vec2 = Vec2::new(1024.0, 768.0);
/// Screen pixels per world unit
pub const VIEW_SCALE: f32 = 3.0;
/// Stage-complete text reveal per second
pub const REVEAL_SPEED: f32 = 0.7;
/// Seed for decorative tile selection
pub const DEFAULT_DECOR_SEED: u64 = 1;

const COIN_ANIM: AnimTimer = AnimTimer::new(0.0, 1.75, 3);
const PORTAL_ANIM: AnimTimer = AnimTimer::new(0.0, 3.0, 3);

/// Things that happened during a tick, for audio/UI collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    CoinCollected { total: u32 },
    PlayerHurt { health: i32 },
    PlayerDied { by_lava: bool },
    PlayerRespawned,
    StageCompleted { stage: usize, coins: u32, total_coins: usize },
    StageLoaded { stage: usize },
    StageLoadFailed { stage: usize, reason: String },
    PauseToggled { paused: bool },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub stage: Stage,
    /// Ordered stage list; empty for a world built from a single stage
    pub sources: Vec<StageSource>,
    pub stage_index: usize,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Every coin of the stage, collected or not
    pub coins: Vec<Coin>,
    /// Indices into `coins` still shown (idle or fading)
    pub active_coins: Vec<usize>,
    pub camera: Camera,
    pub coin_anim: AnimTimer,
    pub portal_anim: AnimTimer,
    /// Stage-complete text progress in [0, 1]
    pub reveal: f32,
    /// Simulated seconds since the stage was loaded
    pub time: f64,
    /// Render-only seed for decorative tiles
    pub decor_seed: u64,
    pub paused: bool,
    pub(super) prev_input: TickInput,
    #[serde(skip)]
    pub(super) events: Vec<SimEvent>,
}

impl World {
    /// Load the first source and start the simulation on it
    pub fn new(sources: Vec<StageSource>) -> Result<Self, LoadError> {
        let first = sources.first().ok_or(LoadError::NoStages)?;
        let stage = first.load().inspect_err(|e| {
            log::error!("Failed to load first stage {}: {e}", first.name());
        })?;
        let mut world = Self::from_stage(stage);
        world.sources = sources;
        Ok(world)
    }

    /// World over a single already-loaded stage
    pub fn from_stage(stage: Stage) -> Self {
        let start = stage.player_start;
        let mut world = Self {
            stage,
            sources: Vec::new(),
            stage_index: 0,
            player: Player::new(start),
            enemies: Vec::new(),
            coins: Vec::new(),
            active_coins: Vec::new(),
            camera: Camera::new(start, CAMERA_LERP, VIEWPORT, VIEW_SCALE),
            coin_anim: COIN_ANIM,
            portal_anim: PORTAL_ANIM,
            reveal: 0.0,
            time: 0.0,
            decor_seed: DEFAULT_DECOR_SEED,
            paused: false,
            prev_input: TickInput::default(),
            events: Vec::new(),
        };
        world.populate();
        world
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self.camera.target = self.player.pos();
        self
    }

    pub fn with_decor_seed(mut self, seed: u64) -> Self {
        self.decor_seed = seed;
        self
    }

    /// Create entities from the stage's spawn list
    fn populate(&mut self) {
        self.enemies = self.stage.spawns.iter().filter_map(Enemy::from_spawn).collect();
        self.coins = self
            .stage
            .spawns
            .iter()
            .filter(|s| s.kind == SpawnKind::Coin)
            .map(|s| Coin::new(s.pos))
            .collect();
        self.active_coins = (0..self.coins.len()).collect();
    }

    pub fn has_next_stage(&self) -> bool {
        self.stage_index + 1 < self.sources.len()
    }

    pub fn is_last_stage(&self) -> bool {
        !self.has_next_stage()
    }

    pub fn total_coins(&self) -> usize {
        self.coins.len()
    }

    /// Load the next stage. The current stage stays active if that fails.
    pub fn advance_stage(&mut self) -> bool {
        if !self.has_next_stage() {
            return false;
        }
        let next = self.stage_index + 1;
        let source = &self.sources[next];
        match source.load() {
            Ok(stage) => {
                log::info!("Entering stage {} ({})", next + 1, source.name());
                self.install(next, stage);
                self.events.push(SimEvent::StageLoaded { stage: next });
                true
            }
            Err(e) => {
                log::error!("Failed to load stage {}: {e}", source.name());
                self.events.push(SimEvent::StageLoadFailed {
                    stage: next,
                    reason: e.to_string(),
                });
                false
            }
        }
    }

    fn install(&mut self, index: usize, stage: Stage) {
        self.stage = stage;
        self.stage_index = index;
        self.populate();
        self.player.coins_collected = 0;
        self.player.reset(self.stage.player_start);
        self.camera.target = self.stage.player_start;
        self.reveal = 0.0;
        self.time = 0.0;
    }

    /// Put every enemy back at its spawn point and the player at the start
    pub(super) fn respawn(&mut self) {
        for enemy in &mut self.enemies {
            enemy.reset();
        }
        self.player.reset(self.stage.player_start);
        log::debug!("Player respawned");
        self.events.push(SimEvent::PlayerRespawned);
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Coins still drawn, with their arena index
    pub fn visible_coins(&self) -> impl Iterator<Item = (usize, &Coin)> {
        self.active_coins.iter().map(|&i| (i, &self.coins[i]))
    }
}
