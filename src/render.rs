//! Draw list handed to an external renderer
//!
//! The simulation does not draw. Each frame it is flattened into plain
//! `SpriteInstance` records in draw order that a GPU renderer can upload
//! as-is.

use bytemuck::{Pod, Zeroable};

use crate::sim::{EntityKind, GameState, ShieldKind, ShipSprite, SizeClass};

/// Sprite sheet ids
pub mod sprite_ids {
    pub const BACKGROUND: u32 = 0;
    pub const SHIP_IDLE: u32 = 1;
    pub const SHIP_FLIGHT: u32 = 2;
    pub const SHIP_EXPLOSION: u32 = 3;
    pub const ASTEROID_LARGE: u32 = 4;
    pub const ASTEROID_MEDIUM: u32 = 5;
    pub const ASTEROID_SMALL: u32 = 6;
    pub const SHIELD_TEMPORARY: u32 = 7;
    pub const SHIELD_PERMANENT: u32 = 8;
}

/// One sprite to draw
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Center in screen pixels
    pub center: [f32; 2],
    pub size: [f32; 2],
    /// Counter-clockwise, degrees
    pub rotation: f32,
    pub sprite: u32,
    /// Animation frame within the sprite
    pub frame: u32,
}

impl SpriteInstance {
    pub const fn new(center: [f32; 2], size: [f32; 2], sprite: u32) -> Self {
        Self {
            center,
            size,
            rotation: 0.0,
            sprite,
            frame: 0,
        }
    }
}

fn asteroid_sprite(size: SizeClass) -> u32 {
    match size {
        SizeClass::Large => sprite_ids::ASTEROID_LARGE,
        SizeClass::Medium => sprite_ids::ASTEROID_MEDIUM,
        SizeClass::Small => sprite_ids::ASTEROID_SMALL,
    }
}

fn shield_sprite(kind: ShieldKind) -> u32 {
    match kind {
        ShieldKind::Temporary => sprite_ids::SHIELD_TEMPORARY,
        ShieldKind::Permanent => sprite_ids::SHIELD_PERMANENT,
    }
}

/// Build this frame's sprites: background tiles, the ship, falling entities
/// in id order, then the ship's explosion on top
pub fn build_draw_list(state: &GameState) -> Vec<SpriteInstance> {
    let mut list = Vec::with_capacity(state.arena.len() + 3);
    let screen = state.screen;

    for top in state.background.tile_offsets() {
        let height = state.tuning.presentation.background_height;
        list.push(SpriteInstance::new(
            [screen.x / 2.0, top + height / 2.0],
            [screen.x, height],
            sprite_ids::BACKGROUND,
        ));
    }

    let ship = &state.ship;
    let ship_instance = |sprite, frame| SpriteInstance {
        frame,
        ..SpriteInstance::new(ship.pos.to_array(), ship.size.to_array(), sprite)
    };
    let mut explosion = None;
    if !ship.removed {
        match ship.sprite() {
            ShipSprite::Idle => list.push(ship_instance(sprite_ids::SHIP_IDLE, 0)),
            ShipSprite::Flight(frame) => list.push(ship_instance(sprite_ids::SHIP_FLIGHT, frame)),
            ShipSprite::Explosion(frame) => {
                explosion = Some(ship_instance(sprite_ids::SHIP_EXPLOSION, frame))
            }
        }
    }

    for entity in state.arena.iter() {
        if !entity.roles.drawable {
            continue;
        }
        list.push(match &entity.kind {
            EntityKind::Asteroid(a) => {
                let edge = a.size.sprite_size() as f32;
                SpriteInstance {
                    rotation: a.rotation,
                    ..SpriteInstance::new(a.pos.to_array(), [edge, edge], asteroid_sprite(a.size))
                }
            }
            EntityKind::Shield(s) => {
                let edge = crate::consts::SHIELD_SIZE as f32;
                SpriteInstance::new(s.pos.to_array(), [edge, edge], shield_sprite(s.kind))
            }
        });
    }

    list.extend(explosion);
    list
}
