//! Health meter and stage-complete text

use glam::Vec2;

use crate::sim::player::Player;
use crate::sim::state::World;

/// Height of one meter row on the meter sheet, in sheet pixels
pub const METER_ROW_HEIGHT: u32 = 7;

/// A line of centered text
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Offset of the line center from the camera, in world units
    pub offset: Vec2,
    /// Font scale
    pub size: f32,
}

/// Meter sheet row for the player's health (row `n` shows `n + 1` points)
pub fn health_meter_row(player: &Player) -> Option<u32> {
    if player.health <= 0 {
        return None;
    }
    Some((player.health.min(player.max_health) - 1) as u32)
}

/// The first `progress` fraction of `text`'s characters
fn typed(text: &str, progress: f32) -> String {
    let n = text.chars().count();
    let shown = ((n as f32 * progress.clamp(0.0, 1.0)) as usize).min(n);
    text.chars().take(shown).collect()
}

/// Stage-complete text, typed out as `world.reveal` goes from 0 to 1.
/// The title types during the first 30%, the coin tally from 50% to 75%
/// and the prompt in the last quarter.
pub fn stage_complete_text(world: &World) -> Vec<TextLine> {
    if !world.player.ended {
        return Vec::new();
    }
    let t = world.reveal;
    let mut lines = vec![TextLine {
        text: typed("Stage Complete", t / 0.3),
        offset: Vec2::new(0.0, -24.0),
        size: 16.0,
    }];
    if t > 0.5 {
        let tally = format!(
            "Coins found: {} / {}",
            world.player.coins_collected,
            world.total_coins()
        );
        lines.push(TextLine {
            text: typed(&tally, (t - 0.5) / 0.25),
            offset: Vec2::new(0.0, 70.0),
            size: 8.0,
        });
    }
    if t > 0.75 {
        let prompt = if world.is_last_stage() {
            "All stages complete - Thanks for playing!"
        } else {
            "Press Jump for next stage"
        };
        lines.push(TextLine {
            text: typed(prompt, (t - 0.75) / 0.25),
            offset: Vec2::new(0.0, 85.0),
            size: 8.0,
        });
    }
    lines
}
