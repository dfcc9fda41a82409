//! Falling entities and the arena that holds them
//!
//! Asteroids and shield pickups share one id-ordered arena. Each slot carries
//! explicit role tags instead of being a member of several overlapping lists.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Asteroid size class, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeClass {
    Large,
    Medium,
    Small,
}

impl SizeClass {
    pub const ALL: [SizeClass; 3] = [SizeClass::Large, SizeClass::Medium, SizeClass::Small];

    /// Damage dealt to the ship on impact
    pub fn damage(self) -> f32 {
        match self {
            SizeClass::Large => 6.0,
            SizeClass::Medium => 4.0,
            SizeClass::Small => 2.0,
        }
    }

    /// Default sprite edge length (pixels)
    pub fn sprite_size(self) -> u32 {
        match self {
            SizeClass::Large => ASTEROID_LARGE_SIZE,
            SizeClass::Medium => ASTEROID_MEDIUM_SIZE,
            SizeClass::Small => ASTEROID_SMALL_SIZE,
        }
    }
}

/// Shield pickup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShieldKind {
    /// Type1: full temporary shield, or a small top-up on a permanent one
    Temporary,
    /// Type2: full permanent shield, once per wave
    Permanent,
}

/// A falling asteroid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    /// Sprite center
    pub pos: Vec2,
    /// Unit travel direction
    pub dir: Vec2,
    pub speed: f32,
    pub size: SizeClass,
    /// Sprite rotation in degrees, [0, 360)
    pub rotation: f32,
    /// Degrees per second
    pub rotation_rate: f32,
}

impl Asteroid {
    /// Advance position and spin. Returns true once the asteroid has fallen
    /// below the screen.
    pub fn update(&mut self, dt: f32, screen_height: f32) -> bool {
        self.pos += self.dir * self.speed * dt;
        self.rotation = crate::wrap_degrees(self.rotation + self.rotation_rate * dt);
        self.pos.y - self.size.sprite_size() as f32 / 2.0 > screen_height
    }
}

/// A falling shield pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shield {
    pub pos: Vec2,
    pub dir: Vec2,
    pub speed: f32,
    pub kind: ShieldKind,
}

impl Shield {
    /// Advance position. Returns true once the pickup has fallen below the screen.
    pub fn update(&mut self, dt: f32, screen_height: f32) -> bool {
        self.pos += self.dir * self.speed * dt;
        self.pos.y - SHIELD_SIZE as f32 / 2.0 > screen_height
    }
}

/// What occupies an arena slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Asteroid(Asteroid),
    Shield(Shield),
}

/// Role tags deciding which passes see an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    pub collidable: bool,
    pub drawable: bool,
}

impl Roles {
    /// Ordinary falling entity: hit-tested and drawn
    pub const FALLING: Roles = Roles {
        collidable: true,
        drawable: true,
    };
}

/// One arena slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub roles: Roles,
    /// Set when the entity is killed; swept at the end of the frame
    pub removed: bool,
}

impl Entity {
    /// Advance the entity one frame and flag it once it leaves the screen
    pub fn update(&mut self, dt: f32, screen_height: f32) {
        let off_screen = match &mut self.kind {
            EntityKind::Asteroid(a) => a.update(dt, screen_height),
            EntityKind::Shield(s) => s.update(dt, screen_height),
        };
        if off_screen {
            self.kill();
        }
    }

    /// Remove from every role immediately; the slot is reclaimed by `sweep`
    pub fn kill(&mut self) {
        self.removed = true;
        self.roles.collidable = false;
        self.roles.drawable = false;
    }

    pub fn is_live(&self) -> bool {
        !self.removed
    }
}

/// Id-ordered storage for asteroids and pickups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityArena {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Default for EntityArena {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a falling entity, returning its id. Ids increase monotonically so
    /// the arena stays sorted.
    pub fn spawn(&mut self, kind: EntityKind) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.push(Entity {
            id,
            kind,
            roles: Roles::FALLING,
            removed: false,
        });
        id
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.entities
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.entities[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Live asteroids
    pub fn asteroids(&self) -> impl Iterator<Item = &Asteroid> {
        self.entities.iter().filter(|e| e.is_live()).filter_map(|e| match &e.kind {
            EntityKind::Asteroid(a) => Some(a),
            EntityKind::Shield(_) => None,
        })
    }

    /// Live shield pickups
    pub fn shields(&self) -> impl Iterator<Item = &Shield> {
        self.entities.iter().filter(|e| e.is_live()).filter_map(|e| match &e.kind {
            EntityKind::Shield(s) => Some(s),
            EntityKind::Asteroid(_) => None,
        })
    }

    pub fn asteroid_count(&self) -> usize {
        self.asteroids().count()
    }

    pub fn shield_count(&self) -> usize {
        self.shields().count()
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.iter().filter(|e| e.is_live()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop removed slots; returns how many were reclaimed
    pub fn sweep(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(Entity::is_live);
        before - self.entities.len()
    }
}
