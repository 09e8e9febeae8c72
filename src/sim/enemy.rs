//! Enemy patrol behaviors
//!
//! All enemies walk back and forth, pausing ("lingering") before they turn.
//! Slimes turn at walls and ledges, bats fly straight through the air and
//! turn only at walls, and imps advance in short hops.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::AnimTimer;
use super::character::{Behavior, Character};
use super::grid::TileGrid;
use super::player::Player;
use super::stage::{Spawn, SpawnKind};
use crate::cell_of;
use crate::consts::*;

/// Linger time after spawning or a reset
pub const INITIAL_LINGER: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Slime,
    Bat,
    Imp,
}

/// Per-kind movement parameters
#[derive(Debug, Clone, Copy)]
pub struct Tuning {
    pub walk_speed: f32,
    pub linger_duration: f32,
    /// How far past the leading edge to look for a ledge; `None` ignores ledges
    pub edge_lookahead: Option<f32>,
    /// Animate even while standing still
    pub locomotion: bool,
    pub anim: AnimTimer,
    pub jump_speed: f32,
    pub crouch_duration: f32,
}

const SLIME: Tuning = Tuning {
    walk_speed: 32.0,
    linger_duration: 2.0,
    edge_lookahead: Some(0.0),
    locomotion: false,
    anim: AnimTimer::new(0.0, 2.0, 3),
    jump_speed: 0.0,
    crouch_duration: 0.0,
};

const BAT: Tuning = Tuning {
    walk_speed: 48.0,
    linger_duration: 0.0,
    edge_lookahead: None,
    locomotion: true,
    anim: AnimTimer::new(0.0, 3.0, 3),
    jump_speed: 0.0,
    crouch_duration: 0.0,
};

const IMP: Tuning = Tuning {
    walk_speed: 64.0,
    linger_duration: 0.8,
    edge_lookahead: Some(2.0 * CELL),
    locomotion: false,
    anim: AnimTimer::new(0.0, 2.0, 3),
    jump_speed: -120.0,
    crouch_duration: 0.2,
};

impl EnemyKind {
    pub fn tuning(self) -> &'static Tuning {
        match self {
            EnemyKind::Slime => &SLIME,
            EnemyKind::Bat => &BAT,
            EnemyKind::Imp => &IMP,
        }
    }

    pub fn behavior(self) -> Behavior {
        match self {
            EnemyKind::Slime => Behavior::Slime,
            EnemyKind::Bat => Behavior::Bat,
            EnemyKind::Imp => Behavior::Imp,
        }
    }

    /// Enemy kind for a spawn marker (coins are not enemies)
    pub fn from_spawn(kind: SpawnKind) -> Option<Self> {
        match kind {
            SpawnKind::Slime => Some(EnemyKind::Slime),
            SpawnKind::Bat => Some(EnemyKind::Bat),
            SpawnKind::Imp => Some(EnemyKind::Imp),
            SpawnKind::Coin => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub body: Character,
    pub spawn: Vec2,
    /// +1 or -1
    pub move_dir: f32,
    pub linger: f32,
    /// Imp only: time left in the crouch before/after a hop
    pub crouch: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2) -> Self {
        let tuning = kind.tuning();
        let mut body = Character::new(kind.behavior(), pos, tuning.anim);
        body.bbox = body.bbox.widened(1.0);
        Self {
            kind,
            body,
            spawn: pos,
            move_dir: 1.0,
            linger: INITIAL_LINGER,
            crouch: tuning.crouch_duration,
        }
    }

    pub fn from_spawn(spawn: &Spawn) -> Option<Self> {
        EnemyKind::from_spawn(spawn.kind).map(|kind| Self::new(kind, spawn.pos))
    }

    /// Return to the spawn point in the initial state
    pub fn reset(&mut self) {
        let tuning = self.kind.tuning();
        self.body.pos = self.spawn;
        self.body.vel = Vec2::ZERO;
        self.body.anim.phase = 0.0;
        self.body.anim.direction = 1.0;
        self.body.facing = 1.0;
        self.body.touched_wall = false;
        self.linger = INITIAL_LINGER;
        self.move_dir = 1.0;
        self.crouch = tuning.crouch_duration;
    }

    /// Advance one tick, then hurt the player on contact.
    /// Returns true if the player took damage.
    pub fn tick(&mut self, grid: &TileGrid, player: &mut Player, dt: f32) -> bool {
        match self.kind {
            EnemyKind::Imp => self.hop(grid, dt),
            EnemyKind::Slime | EnemyKind::Bat => self.patrol(grid, dt),
        }
        self.body.step_motion(grid, dt);
        self.touch_player(player)
    }

    fn patrol(&mut self, grid: &TileGrid, dt: f32) {
        let tuning = self.kind.tuning();
        let mut walk = 0.0;
        if self.linger > 0.0 {
            self.linger -= dt;
        } else {
            walk = self.move_dir;
        }
        self.body.vel.x = tuning.walk_speed * walk;

        if walk != 0.0 {
            self.body.face(walk);
            let at_edge = tuning
                .edge_lookahead
                .is_some_and(|lookahead| self.is_on_edge(grid, lookahead));
            if self.body.touched_wall || at_edge {
                self.turn_around(tuning.linger_duration);
                // stand still on the turning tick
                self.body.vel.x = 0.0;
            }
        }

        let anim = &mut self.body.anim;
        if tuning.locomotion || walk != 0.0 {
            anim.animate_ping_pong(dt);
        } else {
            let rest = 0.5 / anim.frames as f32;
            anim.ease_toward(rest, dt);
        }
    }

    /// Crouch, hop, land, linger, repeat
    fn hop(&mut self, grid: &TileGrid, dt: f32) {
        let tuning = self.kind.tuning();
        let mut walk = 0.0;
        if self.crouch > 0.0 {
            self.crouch -= dt;
            if self.crouch <= 0.0 && self.linger <= 0.0 {
                self.body.vel.y = tuning.jump_speed;
            }
        } else if self.linger > 0.0 {
            self.linger -= dt;
            if self.linger <= 0.0 {
                self.crouch = tuning.crouch_duration;
            }
        } else {
            walk = self.move_dir;
        }
        self.body.vel.x = tuning.walk_speed * walk;

        if self.linger <= 0.0 {
            self.body.face(self.move_dir);
        }

        if walk != 0.0 && self.body.grounded && self.body.vel.y >= 0.0 {
            // landed
            self.crouch = tuning.crouch_duration;
            self.linger = tuning.linger_duration;
            let lookahead = tuning.edge_lookahead.unwrap_or(0.0);
            if self.body.touched_wall || self.is_on_edge(grid, lookahead) {
                self.move_dir = -self.move_dir;
                self.body.touched_wall = false;
            }
        } else if !self.body.grounded {
            self.body.touched_wall = false;
        }
    }

    fn turn_around(&mut self, linger: f32) {
        self.linger = linger;
        self.move_dir = -self.move_dir;
        self.body.touched_wall = false;
    }

    /// Whether there is a drop within `lookahead` units past the leading edge
    pub fn is_on_edge(&self, grid: &TileGrid, lookahead: f32) -> bool {
        if !self.body.grounded {
            return false;
        }
        let b = &self.body;
        let lead = b.pos.x + if self.move_dir > 0.0 { b.bbox.max.x } else { b.bbox.min.x };
        let row = cell_of(b.feet() + GROUND_PROBE);
        let mut d = 0.0;
        while d <= lookahead {
            if !grid.is_solid(cell_of(lead + d * self.move_dir), row) {
                return true;
            }
            d += CELL;
        }
        false
    }

    fn touch_player(&self, player: &mut Player) -> bool {
        if player.dead || player.is_invincible() {
            return false;
        }
        let p = &player.body;
        if self.body.bbox.overlaps(self.body.pos, &p.bbox, p.pos) {
            return player.damage();
        }
        false
    }
}
