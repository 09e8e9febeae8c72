//! Player state machine
//!
//! Alive, hurt-invincible (a timer layered on alive), dead, and ended
//! (reached the goal). Death comes from running out of health, touching lava
//! or falling off the bottom of the stage, and is followed by a respawn
//! after `RESPAWN_DELAY`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::AnimTimer;
use super::character::{Behavior, Character};
use super::grid::{Tile, TileGrid};
use crate::consts::*;

pub const WALK_SPEED: f32 = 64.0;
pub const JUMP_SPEED: f32 = -150.0;
/// Upward knockback when hurt
pub const HURT_JUMP_SPEED: f32 = -120.0;
pub const MAX_HEALTH: i32 = 3;
pub const FLASH_DURATION: f32 = 0.2;
pub const INVINCIBLE_DURATION: f32 = 2.0;
pub const RESPAWN_DELAY: f32 = 2.2;
/// Descent speed while dead in lava (independent of gravity)
pub const LAVA_SINK_SPEED: f32 = 2.0;
/// Fraction of a lava surface cell that is air above the molten part
pub const LAVA_SURFACE_DEPTH: f32 = 0.3;

const WALK_ANIM: AnimTimer = AnimTimer::new(0.5, 1.75, 3);

/// What the world must do after the player's tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSignal {
    None,
    Died,
    ReachedGoal,
    /// Respawn delay elapsed; enemies must be reset
    Respawned,
}

/// Movement intents for one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct Walk {
    pub left: bool,
    pub right: bool,
}

impl Walk {
    fn dir(self) -> f32 {
        if self.left {
            -1.0
        } else if self.right {
            1.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Character,
    pub health: i32,
    pub max_health: i32,
    /// Remaining damage-flash time
    pub flash: f32,
    /// Remaining invincibility after a hit
    pub invincible: f32,
    /// Still rising from a knockback (drawn with the hurt frame)
    pub just_hurt: bool,
    pub dead: bool,
    pub dead_timer: f32,
    pub burnt_by_lava: bool,
    pub ended: bool,
    pub coins_collected: u32,
    prev_walk: f32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Character::new(Behavior::Player, pos, WALK_ANIM),
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            flash: 0.0,
            invincible: 0.0,
            just_hurt: false,
            dead: false,
            dead_timer: 0.0,
            burnt_by_lava: false,
            ended: false,
            coins_collected: 0,
            prev_walk: 0.0,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Put the player back at `start` with full health. Coins are kept.
    pub fn reset(&mut self, start: Vec2) {
        self.body.pos = start;
        self.body.vel = Vec2::ZERO;
        self.body.anim.phase = WALK_ANIM.phase;
        self.body.anim.direction = 1.0;
        self.prev_walk = 0.0;
        self.flash = 0.0;
        self.dead = false;
        self.dead_timer = 0.0;
        self.burnt_by_lava = false;
        self.ended = false;
        self.health = self.max_health;
        self.just_hurt = false;
    }

    /// Take one hit. Ignored while dead or invincible.
    pub fn damage(&mut self) -> bool {
        if self.dead || self.invincible > 0.0 {
            return false;
        }
        self.flash = FLASH_DURATION;
        self.body.vel.y = HURT_JUMP_SPEED;
        self.health -= 1;
        if self.health <= 0 {
            self.die();
        } else {
            self.invincible = INVINCIBLE_DURATION;
            self.just_hurt = true;
        }
        true
    }

    /// Enter the dead state. Returns false if already dead.
    pub fn die(&mut self) -> bool {
        if self.dead {
            return false;
        }
        self.flash = FLASH_DURATION;
        self.body.vel.y = JUMP_SPEED;
        self.dead = true;
        log::debug!("Player died at ({:.1}, {:.1})", self.body.pos.x, self.body.pos.y);
        true
    }

    /// Jump if standing on ground and able to act
    pub fn try_jump(&mut self) -> bool {
        if self.ended || self.dead || !self.body.grounded {
            return false;
        }
        self.body.vel.y = JUMP_SPEED;
        true
    }

    /// Invincible and blinking after a hit
    pub fn is_invincible(&self) -> bool {
        self.invincible > 0.0
    }

    /// Advance one tick
    pub fn tick(&mut self, grid: &TileGrid, walk: Walk, dt: f32) -> PlayerSignal {
        let was_dead = self.dead;

        if self.flash > 0.0 {
            self.flash -= dt;
        }

        if self.dead {
            // pulled twice as hard as the living: here and in the character step
            self.body.vel.x = 0.0;
            if !self.body.grounded {
                self.body.vel.y += self.body.gravity * dt;
            }
            self.body.vel.y = self.body.vel.y.min(MAX_FALL_SPEED);
            self.dead_timer += dt;
            if self.dead_timer > RESPAWN_DELAY {
                return PlayerSignal::Respawned;
            }
        } else {
            if self.invincible > 0.0 {
                self.invincible -= dt;
            }
            if self.body.vel.y >= 0.0 {
                self.just_hurt = false;
            }
            self.update_walk(walk, dt);
        }

        self.body.step_motion(grid, dt);

        let ((x0, y0), (x1, y1)) = self.body.bbox.touched_cells(self.body.pos, grid);
        self.check_lava(grid, (x0, y0), (x1, y1));
        let mut signal = PlayerSignal::None;
        if !self.ended && touches(grid, (x0, y0), (x1, y1), |_, _, t| t == Tile::GOAL) {
            self.ended = true;
            signal = PlayerSignal::ReachedGoal;
        }

        let b = self.body.bbox;
        self.body.pos.x = self
            .body
            .pos
            .x
            .min(grid.pixel_width() - b.max.x)
            .max(-b.min.x);
        if !self.dead && self.body.feet() >= grid.pixel_height() {
            self.die();
        }

        if self.dead && !was_dead {
            PlayerSignal::Died
        } else {
            signal
        }
    }

    fn update_walk(&mut self, walk: Walk, dt: f32) {
        let dir = if self.ended { 0.0 } else { walk.dir() };
        self.body.vel.x = WALK_SPEED * dir;

        if dir == 0.0 {
            self.body.anim.ease_toward(0.5, dt);
        } else {
            // start mid-stride instead of easing out of the idle frame
            if self.prev_walk == 0.0 {
                self.body.anim.phase = 0.75;
            }
            self.body.face(dir);
            self.body.anim.animate_ping_pong(dt);
        }
        self.prev_walk = dir;
    }

    /// Die on lava contact; if already dead, sink slowly instead of falling
    fn check_lava(&mut self, grid: &TileGrid, lo: (i32, i32), hi: (i32, i32)) {
        let feet = self.body.feet();
        let in_lava = touches(grid, lo, hi, |_, j, t| {
            t == Tile::LAVA
                || (t == Tile::LAVA_SURFACE && feet > CELL * (j as f32 + LAVA_SURFACE_DEPTH))
        });
        if !in_lava {
            return;
        }
        self.burnt_by_lava = true;
        if self.dead {
            self.body.vel.y = self.body.vel.y.min(LAVA_SINK_SPEED);
        } else {
            self.die();
        }
    }
}

/// Whether any cell in the inclusive range matches
fn touches(
    grid: &TileGrid,
    (x0, y0): (i32, i32),
    (x1, y1): (i32, i32),
    pred: impl Fn(i32, i32, Tile) -> bool,
) -> bool {
    (y0..=y1).any(|j| (x0..=x1).any(|i| pred(i, j, grid.get(i, j))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_grid(width: u32) -> TileGrid {
        let mut grid = TileGrid::new(width, 4);
        for x in 0..width as i32 {
            grid.set(x, 3, Tile::BLOCK_A);
        }
        grid
    }

    fn settled_player(grid: &TileGrid) -> Player {
        let mut p = Player::new(Vec2::new(40.0, 39.0));
        for _ in 0..30 {
            p.tick(grid, Walk::default(), SIM_DT);
        }
        assert!(p.body.grounded);
        p
    }

    #[test]
    fn test_damage_grants_invincibility() {
        let mut p = Player::new(Vec2::new(40.0, 39.0));
        assert!(p.damage());
        assert_eq!(p.health, MAX_HEALTH - 1);
        assert_eq!(p.flash, FLASH_DURATION);
        assert_eq!(p.body.vel.y, HURT_JUMP_SPEED);
        assert!(p.is_invincible());
        assert!(!p.dead);
    }

    #[test]
    fn test_damage_ignored_while_invincible() {
        let mut p = Player::new(Vec2::new(40.0, 39.0));
        p.invincible = 0.5;
        p.flash = 0.0;
        assert!(!p.damage());
        assert_eq!(p.health, MAX_HEALTH);
        assert_eq!(p.flash, 0.0);
    }

    #[test]
    fn test_fatal_damage_kills_once() {
        let mut p = Player::new(Vec2::new(40.0, 39.0));
        p.health = 1;
        assert!(p.damage());
        assert!(p.dead);
        assert_eq!(p.health, 0);
        assert_eq!(p.body.vel.y, JUMP_SPEED);

        for _ in 0..5 {
            assert!(!p.damage());
            assert!(!p.die());
        }
        assert_eq!(p.health, 0);
        assert!(p.dead);
    }

    #[test]
    fn test_walks_and_faces() {
        let grid = flat_grid(20);
        let mut p = settled_player(&grid);
        let x0 = p.pos().x;
        for _ in 0..30 {
            p.tick(&grid, Walk { left: false, right: true }, SIM_DT);
        }
        assert!((p.pos().x - (x0 + WALK_SPEED * 0.5)).abs() < 0.1);
        assert_eq!(p.body.facing, 1.0);
        p.tick(&grid, Walk { left: true, right: true }, SIM_DT);
        assert_eq!(p.body.vel.x, -WALK_SPEED);
        assert_eq!(p.body.facing, -1.0);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let grid = flat_grid(10);
        let mut p = settled_player(&grid);
        assert!(p.try_jump());
        p.tick(&grid, Walk::default(), SIM_DT);
        assert!(!p.body.grounded);
        assert!(!p.try_jump());
    }

    #[test]
    fn test_x_clamped_to_stage() {
        let grid = flat_grid(4);
        let mut p = settled_player(&grid);
        for _ in 0..200 {
            p.tick(&grid, Walk { left: true, right: false }, SIM_DT);
        }
        assert_eq!(p.pos().x, -p.body.bbox.min.x);
        for _ in 0..200 {
            p.tick(&grid, Walk { left: false, right: true }, SIM_DT);
        }
        assert_eq!(p.pos().x, grid.pixel_width() - p.body.bbox.max.x);
    }

    #[test]
    fn test_falling_off_stage_kills() {
        let grid = TileGrid::new(4, 4);
        let mut p = Player::new(Vec2::new(24.0, 8.0));
        let mut died = 0;
        for _ in 0..120 {
            if p.tick(&grid, Walk::default(), SIM_DT) == PlayerSignal::Died {
                died += 1;
            }
        }
        assert_eq!(died, 1);
        assert!(p.dead);
    }

    #[test]
    fn test_respawn_after_delay() {
        let grid = flat_grid(10);
        let mut p = settled_player(&grid);
        p.die();
        let mut ticks = 0;
        loop {
            ticks += 1;
            if p.tick(&grid, Walk::default(), SIM_DT) == PlayerSignal::Respawned {
                break;
            }
            assert!(ticks < 1000);
        }
        let expected = (RESPAWN_DELAY / SIM_DT).ceil() as i32;
        assert!((ticks - expected).abs() <= 1, "respawned after {ticks} ticks");
    }

    #[test]
    fn test_dead_player_ignores_input() {
        let grid = flat_grid(10);
        let mut p = settled_player(&grid);
        p.die();
        p.tick(&grid, Walk { left: false, right: true }, SIM_DT);
        assert_eq!(p.body.vel.x, 0.0);
        assert!(!p.try_jump());
    }

    #[test]
    fn test_goal_ends_stage() {
        let mut grid = flat_grid(10);
        grid.set(4, 2, Tile::GOAL);
        let mut p = settled_player(&grid);
        let mut reached = None;
        for i in 0..200 {
            if p.tick(&grid, Walk { left: false, right: true }, SIM_DT) == PlayerSignal::ReachedGoal {
                reached = Some(i);
                break;
            }
        }
        assert!(reached.is_some());
        assert!(p.ended);
        p.tick(&grid, Walk { left: false, right: true }, SIM_DT);
        assert_eq!(p.body.vel.x, 0.0);
        assert!(!p.try_jump());
    }

    #[test]
    fn test_lava_surface_has_exposed_top() {
        let mut grid = TileGrid::new(4, 6);
        for x in 0..4 {
            grid.set(x, 3, Tile::LAVA_SURFACE);
            grid.set(x, 4, Tile::LAVA);
        }
        let surface = 3.0 * CELL;
        let mut p = Player::new(Vec2::ZERO);
        let reach = p.body.bbox.max.y;
        let touched = |p: &Player| p.body.bbox.touched_cells(p.pos(), &grid);

        // feet in the top 0.3 of the surface cell
        p.body.pos = Vec2::new(24.0, surface + 0.25 * CELL - reach);
        let (lo, hi) = touched(&p);
        p.check_lava(&grid, lo, hi);
        assert!(!p.dead);
        assert!(!p.burnt_by_lava);

        p.body.pos.y = surface + 0.35 * CELL - reach;
        let (lo, hi) = touched(&p);
        p.check_lava(&grid, lo, hi);
        assert!(p.dead);
        assert!(p.burnt_by_lava);
    }

    #[test]
    fn test_corpse_falls_faster() {
        let grid = TileGrid::new(4, 40);
        let mut p = Player::new(Vec2::new(24.0, 100.0));
        p.body.grounded = false;
        p.die();
        p.tick(&grid, Walk::default(), SIM_DT);
        let expected = JUMP_SPEED + 2.0 * GRAVITY * SIM_DT;
        assert!((p.body.vel.y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_reset_restores_health_keeps_coins() {
        let mut p = Player::new(Vec2::new(40.0, 39.0));
        p.coins_collected = 4;
        p.health = 0;
        p.dead = true;
        p.ended = true;
        p.reset(Vec2::new(10.0, 20.0));
        assert_eq!(p.pos(), Vec2::new(10.0, 20.0));
        assert_eq!(p.health, MAX_HEALTH);
        assert!(!p.dead && !p.ended);
        assert_eq!(p.coins_collected, 4);
    }
}
