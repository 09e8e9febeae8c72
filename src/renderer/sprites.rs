//! Character and item frames

use super::{Sheet, SheetCell, Sprite, sprite_origin};
use crate::sim::anim::AnimTimer;
use crate::sim::coin::Coin;
use crate::sim::enemy::{Enemy, EnemyKind};
use crate::sim::player::Player;

/// Invincibility blinks per second
pub const INVINCIBLE_BLINK_FREQUENCY: f32 = 3.0;

/// Player frame, or `None` during the off half of an invincibility blink
pub fn player_sprite(player: &Player) -> Option<Sprite> {
    let body = &player.body;
    let cell = if player.flash > 0.0 {
        SheetCell::new(0, 1)
    } else if player.dead {
        if body.grounded || player.burnt_by_lava {
            SheetCell::new(2, 2)
        } else {
            SheetCell::new(1, 1)
        }
    } else {
        if player.invincible > 0.0 && (player.invincible * INVINCIBLE_BLINK_FREQUENCY) % 1.0 < 0.25 {
            return None;
        }
        if !body.grounded {
            let rising = body.vel.y < 0.0 && !player.just_hurt;
            SheetCell::new(if rising { 2 } else { 1 }, 1)
        } else if player.ended {
            // fanfare
            SheetCell::new(1, 2)
        } else {
            SheetCell::new(body.anim.frame(), 0)
        }
    };
    Some(Sprite {
        sheet: Sheet::Player,
        cell,
        pos: sprite_origin(body.pos),
        flip_x: body.facing < 0.0,
    })
}

pub fn enemy_sprite(enemy: &Enemy) -> Sprite {
    let body = &enemy.body;
    let cell = match enemy.kind {
        EnemyKind::Slime => SheetCell::new(body.anim.frame(), 0),
        EnemyKind::Imp => {
            let col = if enemy.crouch > 0.0 {
                2
            } else if body.grounded {
                0
            } else {
                1
            };
            SheetCell::new(col, 1)
        }
        EnemyKind::Bat => SheetCell::new(body.anim.frame(), 2),
    };
    Sprite {
        sheet: Sheet::Enemies,
        cell,
        pos: sprite_origin(body.pos),
        flip_x: body.facing < 0.0,
    }
}

/// Spinning coin, or the sparkle of a collected one rising as it fades
pub fn coin_sprite(coin: &Coin, anim: &AnimTimer) -> Sprite {
    let cell = if coin.is_collected() {
        SheetCell::new(0, 1)
    } else {
        SheetCell::new(1 + anim.frame(), 1)
    };
    let mut pos = sprite_origin(coin.pos);
    pos.y -= coin.lift();
    Sprite {
        sheet: Sheet::Items,
        cell,
        pos,
        flip_x: false,
    }
}
