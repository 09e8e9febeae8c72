//! Fixed timestep simulation tick
//!
//! Advances the whole world by one step. Order within a tick:
//! input edges, enemies (with contact damage), player, coins, shared
//! animations, camera, stage-complete reveal.

use serde::{Deserialize, Serialize};

use super::player::{PlayerSignal, Walk};
use super::state::{REVEAL_SPEED, SimEvent, World};

/// Held input states for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Jump, or continue to the next stage once the current one is complete
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    let jump_pressed = input.jump && !world.prev_input.jump;
    let pause_pressed = input.pause && !world.prev_input.pause;
    world.prev_input = *input;

    if pause_pressed {
        world.paused = !world.paused;
        log::info!("{}", if world.paused { "Paused" } else { "Resumed" });
        world.events.push(SimEvent::PauseToggled {
            paused: world.paused,
        });
    }
    if world.paused {
        return;
    }

    world.time += dt as f64;

    if jump_pressed {
        handle_jump(world);
    }

    // Enemies
    let grid = &world.stage.grid;
    for enemy in &mut world.enemies {
        if enemy.tick(grid, &mut world.player, dt) {
            world.events.push(if world.player.dead {
                SimEvent::PlayerDied { by_lava: false }
            } else {
                SimEvent::PlayerHurt {
                    health: world.player.health,
                }
            });
        }
    }

    // Player
    let walk = Walk {
        left: input.move_left,
        right: input.move_right,
    };
    match world.player.tick(&world.stage.grid, walk, dt) {
        PlayerSignal::None => {}
        PlayerSignal::Died => world.events.push(SimEvent::PlayerDied {
            by_lava: world.player.burnt_by_lava,
        }),
        PlayerSignal::ReachedGoal => {
            log::info!(
                "Stage {} complete, coins {}/{}",
                world.stage_index + 1,
                world.player.coins_collected,
                world.total_coins()
            );
            world.events.push(SimEvent::StageCompleted {
                stage: world.stage_index,
                coins: world.player.coins_collected,
                total_coins: world.total_coins(),
            });
        }
        PlayerSignal::Respawned => world.respawn(),
    }

    // Coins
    world.coin_anim.animate_ping_pong(dt);
    for &i in &world.active_coins {
        if world.coins[i].tick(&mut world.player, dt) {
            log::debug!("Coin {i} collected");
            world.events.push(SimEvent::CoinCollected {
                total: world.player.coins_collected,
            });
        }
    }
    let coins = &world.coins;
    world.active_coins.retain(|&i| !coins[i].is_gone());

    world.portal_anim.animate_ping_pong(dt);

    if !world.player.dead {
        let size = world.stage.pixel_size();
        world.camera.follow(world.player.pos(), size);
    }

    world.reveal = if world.player.ended {
        (world.reveal + REVEAL_SPEED * dt).min(1.0)
    } else {
        0.0
    };
}

fn handle_jump(world: &mut World) {
    if world.player.ended {
        if world.reveal >= 1.0 {
            world.advance_stage();
        }
    } else {
        world.player.try_jump();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::player::{LAVA_SINK_SPEED, LAVA_SURFACE_DEPTH, MAX_HEALTH};
    use crate::sim::stage::{PixelGrid, StageSource, load_stage};
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn world_from(rows: &[&str]) -> World {
        let stage = load_stage(&PixelGrid::from_glyphs(rows)).unwrap();
        World::from_stage(stage)
    }

    const RIGHT: TickInput = TickInput {
        move_left: false,
        move_right: true,
        jump: false,
        pause: false,
    };
    const JUMP: TickInput = TickInput {
        move_left: false,
        move_right: false,
        jump: true,
        pause: false,
    };
    const PAUSE: TickInput = TickInput {
        move_left: false,
        move_right: false,
        jump: false,
        pause: true,
    };
    const IDLE: TickInput = TickInput {
        move_left: false,
        move_right: false,
        jump: false,
        pause: false,
    };

    fn run(world: &mut World, input: TickInput, ticks: usize) {
        for _ in 0..ticks {
            tick(world, &input, SIM_DT);
        }
    }

    fn goal_rows() -> [&'static str; 4] {
        [
            "..........",
            "..........",
            ".P.....G..",
            "##########",
        ]
    }

    /// Walk into the goal and wait for the stage-complete text
    fn finish_stage(world: &mut World) {
        run(world, RIGHT, 180);
        assert!(world.player.ended);
        run(world, IDLE, 120);
        assert_eq!(world.reveal, 1.0);
    }

    #[test]
    fn test_walk_to_goal() {
        let mut world = world_from(&goal_rows());
        let mut ticks = 0;
        while !world.player.ended {
            tick(&mut world, &RIGHT, SIM_DT);
            ticks += 1;
            assert!(ticks < 300);
        }
        assert_eq!(world.player.health, MAX_HEALTH);
        assert!(!world.player.dead);
        let events = world.drain_events();
        assert_eq!(
            events,
            vec![SimEvent::StageCompleted {
                stage: 0,
                coins: 0,
                total_coins: 0
            }]
        );

        // control is gone
        let x = world.player.pos().x;
        run(&mut world, RIGHT, 30);
        assert_eq!(world.player.pos().x, x);
        assert!(world.reveal > 0.0 && world.reveal < 1.0);
        run(&mut world, IDLE, 100);
        assert_eq!(world.reveal, 1.0);

        // last stage: jumping does nothing
        tick(&mut world, &JUMP, SIM_DT);
        assert!(world.player.ended);
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn test_jump_advances_only_after_reveal() {
        let rows = goal_rows();
        let sources = vec![
            StageSource::Pixels(PixelGrid::from_glyphs(&rows)),
            StageSource::Pixels(PixelGrid::from_glyphs(&[
                "..........",
                "...P......",
                "##########",
            ])),
        ];
        let mut world = World::new(sources).unwrap();
        while !world.player.ended {
            tick(&mut world, &RIGHT, SIM_DT);
        }

        // too early
        tick(&mut world, &JUMP, SIM_DT);
        tick(&mut world, &IDLE, SIM_DT);
        assert_eq!(world.stage_index, 0);

        run(&mut world, IDLE, 120);
        world.drain_events();
        tick(&mut world, &JUMP, SIM_DT);
        assert_eq!(world.stage_index, 1);
        assert!(!world.player.ended);
        assert_eq!(world.reveal, 0.0);
        assert_eq!(world.drain_events(), vec![SimEvent::StageLoaded { stage: 1 }]);
        assert!((world.player.pos().x - 56.0).abs() < 1e-3);
    }

    #[test]
    fn test_failed_advance_stays_on_stage() {
        let sources = vec![
            StageSource::Pixels(PixelGrid::from_glyphs(&goal_rows())),
            StageSource::File(PathBuf::from("/nonexistent/stage2.bmp")),
        ];
        let mut world = World::new(sources).unwrap();
        finish_stage(&mut world);
        world.drain_events();
        tick(&mut world, &JUMP, SIM_DT);
        assert_eq!(world.stage_index, 0);
        assert!(world.player.ended);
        assert!(matches!(
            world.drain_events().as_slice(),
            [SimEvent::StageLoadFailed { stage: 1, .. }]
        ));
    }

    #[test]
    fn test_jump_is_edge_triggered() {
        let mut world = world_from(&goal_rows());
        run(&mut world, IDLE, 30);
        assert!(world.player.body.grounded);

        let mut takeoffs = 0;
        let mut was_rising = false;
        for _ in 0..240 {
            tick(&mut world, &JUMP, SIM_DT);
            let rising = world.player.body.vel.y < 0.0;
            if rising && !was_rising {
                takeoffs += 1;
            }
            was_rising = rising;
        }
        assert_eq!(takeoffs, 1);
    }

    #[test]
    fn test_lava_kills_and_respawns() {
        let mut world = world_from(&[
            "..........",
            "..........",
            ".P..~~~...",
            "##########",
        ]);
        let start = world.stage.player_start;

        let mut died = None;
        for i in 0..120 {
            tick(&mut world, &RIGHT, SIM_DT);
            if world.player.dead {
                died = Some(i);
                break;
            }
        }
        assert!(died.is_some());
        assert!(world.player.burnt_by_lava);
        assert_eq!(
            world.drain_events(),
            vec![SimEvent::PlayerDied { by_lava: true }]
        );

        let mut respawned = false;
        for _ in 0..((RESPAWN_TICKS as usize) + 5) {
            tick(&mut world, &IDLE, SIM_DT);
            if !world.player.dead {
                respawned = true;
                break;
            }
        }
        assert!(respawned);
        assert_eq!(world.player.pos(), start);
        assert_eq!(world.player.health, MAX_HEALTH);
        assert_eq!(world.drain_events(), vec![SimEvent::PlayerRespawned]);
    }

    const RESPAWN_TICKS: f32 = crate::sim::player::RESPAWN_DELAY / SIM_DT;

    #[test]
    fn test_drop_into_deep_lava_pool() {
        let mut world = world_from(&[
            "......",
            "..P...",
            "#~~~##",
            "#~~~##",
            "#~~~##",
            "######",
        ]);
        let surface_top = 2.0 * CELL;
        let mut first_overlap = None;
        let mut died_at = None;
        for i in 0..120 {
            tick(&mut world, &IDLE, SIM_DT);
            let feet = world.player.body.feet();
            if first_overlap.is_none() && feet >= surface_top {
                first_overlap = Some(i);
            }
            if world.player.dead {
                died_at = Some(i);
                break;
            }
            // air above the pool and the exposed top of the surface are safe
            assert!(feet <= surface_top + CELL * LAVA_SURFACE_DEPTH + 1e-3);
        }
        let (first_overlap, died_at) = (first_overlap.unwrap(), died_at.unwrap());
        assert!(
            died_at - first_overlap <= 10,
            "died {} ticks after reaching the surface",
            died_at - first_overlap
        );
        assert_eq!(
            world.drain_events(),
            vec![SimEvent::PlayerDied { by_lava: true }]
        );

        // sinks slowly instead of falling through the pool
        let feet = world.player.body.feet();
        run(&mut world, IDLE, 60);
        assert!(world.player.dead);
        assert!(world.player.body.vel.y <= LAVA_SINK_SPEED);
        assert!(world.player.body.feet() < feet + 2.0 * CELL);
        assert!(world.player.body.feet() < 5.0 * CELL);
    }

    #[test]
    fn test_respawn_resets_enemies() {
        let mut world = world_from(&[
            "..........",
            "..........",
            ".P....s...",
            "##########",
        ]);
        let spawn = world.enemies[0].spawn;
        run(&mut world, IDLE, 30);
        world.player.die();
        run(&mut world, IDLE, 60);
        assert_ne!(world.enemies[0].body.pos, spawn);

        for _ in 0..200 {
            tick(&mut world, &IDLE, SIM_DT);
            if !world.player.dead {
                break;
            }
        }
        assert!(!world.player.dead);
        assert_eq!(world.enemies[0].body.pos, spawn);
        assert_eq!(world.enemies[0].move_dir, 1.0);
    }

    #[test]
    fn test_coin_collected_once() {
        let mut world = world_from(&[
            "..........",
            ".P..c.....",
            "##########",
        ]);
        let mut collected = 0;
        for _ in 0..240 {
            tick(&mut world, &RIGHT, SIM_DT);
            collected += world
                .drain_events()
                .iter()
                .filter(|e| matches!(e, SimEvent::CoinCollected { .. }))
                .count();
        }
        assert_eq!(collected, 1);
        assert_eq!(world.player.coins_collected, 1);
        assert!(world.active_coins.is_empty());
        assert_eq!(world.total_coins(), 1);
        assert!(world.coins[0].is_gone());
    }

    #[test]
    fn test_enemy_contact_hurts() {
        let mut world = world_from(&[
            "..........",
            "..........",
            ".P.s......",
            "##########",
        ]);
        let mut hurt = false;
        for _ in 0..180 {
            tick(&mut world, &RIGHT, SIM_DT);
            if world
                .drain_events()
                .iter()
                .any(|e| matches!(e, SimEvent::PlayerHurt { .. }))
            {
                hurt = true;
                break;
            }
        }
        assert!(hurt);
        assert_eq!(world.player.health, MAX_HEALTH - 1);
        assert!(world.player.is_invincible());
    }

    #[test]
    fn test_pause_freezes_world() {
        let mut world = world_from(&goal_rows());
        run(&mut world, IDLE, 30);

        // holding pause toggles once
        run(&mut world, PAUSE, 10);
        assert!(world.paused);
        assert_eq!(
            world.drain_events(),
            vec![SimEvent::PauseToggled { paused: true }]
        );

        let pos = world.player.pos();
        let time = world.time;
        run(&mut world, RIGHT, 60);
        assert_eq!(world.player.pos(), pos);
        assert_eq!(world.time, time);

        tick(&mut world, &PAUSE, SIM_DT);
        assert!(!world.paused);
        run(&mut world, RIGHT, 10);
        assert!(world.player.pos().x > pos.x);
    }

    #[test]
    fn test_camera_follows_living_player() {
        let mut world = world_from(&goal_rows());
        world.camera = crate::sim::camera::Camera::new(
            world.player.pos(),
            1.0,
            glam::Vec2::new(48.0, 48.0),
            1.0,
        );
        run(&mut world, RIGHT, 30);
        assert!((world.camera.target.x - world.player.pos().x).abs() < 1e-3);

        world.player.die();
        let frozen = world.camera.target;
        run(&mut world, IDLE, 30);
        assert_eq!(world.camera.target, frozen);
    }

    fn input_strategy() -> impl Strategy<Value = Vec<TickInput>> {
        prop::collection::vec(
            (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(l, r, j)| TickInput {
                move_left: l,
                move_right: r,
                jump: j,
                pause: false,
            }),
            1..200,
        )
    }

    proptest! {
        #[test]
        fn prop_replay_is_deterministic(inputs in input_strategy()) {
            let rows = [
                "..........",
                ".c.....v..",
                ".P..s..i.G",
                "####..~###",
                "##########",
            ];
            let mut a = world_from(&rows);
            let mut b = world_from(&rows);
            for input in &inputs {
                tick(&mut a, input, SIM_DT);
                tick(&mut b, input, SIM_DT);
            }
            prop_assert_eq!(a.player.pos(), b.player.pos());
            prop_assert_eq!(a.player.health, b.player.health);
            prop_assert_eq!(a.drain_events(), b.drain_events());
            for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
                prop_assert_eq!(ea.body.pos, eb.body.pos);
            }
        }

        #[test]
        fn prop_player_stays_in_stage_horizontally(inputs in input_strategy()) {
            let mut world = world_from(&goal_rows());
            for input in &inputs {
                tick(&mut world, input, SIM_DT);
                let x = world.player.pos().x;
                let b = world.player.body.bbox;
                prop_assert!(x >= -b.min.x);
                prop_assert!(x <= world.stage.grid.pixel_width() - b.max.x);
            }
        }
    }
}
