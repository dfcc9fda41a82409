//! Ship-versus-world collision and damage resolution
//!
//! Every live collidable entity is first rejected by a cheap bounding-circle
//! test, then checked pixel by pixel against the ship's mask. Asteroids are
//! tested with their mask rotated to the current sprite angle.

use glam::Vec2;

use super::entity::{EntityArena, EntityKind, ShieldKind, SizeClass};
use super::mask::{CollisionMask, SpriteMasks};
use super::ship::Ship;

/// What happened during one resolution pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Asteroids that hit the ship (id, size)
    pub impacts: Vec<(u32, SizeClass)>,
    /// Pickups collected (id, kind)
    pub pickups: Vec<(u32, ShieldKind)>,
    /// Ship health hit zero this pass and its explosion started
    pub ship_destroyed: bool,
}

/// Half the diagonal of a mask's box: no pixel lies further from the center
fn bounding_radius(mask: &CollisionMask) -> f32 {
    mask.size().length() / 2.0
}

/// Pixel-accurate overlap of two sprites given their centers
pub fn masks_collide(a: &CollisionMask, a_center: Vec2, b: &CollisionMask, b_center: Vec2) -> bool {
    if a_center.distance(b_center) > bounding_radius(a) + bounding_radius(b) {
        return false;
    }
    let offset = b.top_left(b_center) - a.top_left(a_center);
    a.overlaps(b, offset)
}

/// Apply all ship collisions for this frame. Does nothing while the ship is
/// exploding.
pub fn resolve_collisions(
    ship: &mut Ship,
    arena: &mut EntityArena,
    masks: &SpriteMasks,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    if ship.exploding {
        return report;
    }

    let ship_mask = &masks.ship;
    let ship_radius = bounding_radius(ship_mask);

    // Hazards first
    for entity in arena.iter_mut() {
        if !entity.roles.collidable {
            continue;
        }
        let EntityKind::Asteroid(asteroid) = &entity.kind else {
            continue;
        };
        let base = masks.asteroid(asteroid.size);
        if ship.pos.distance(asteroid.pos) > ship_radius + bounding_radius(base) {
            continue;
        }
        let rotated = base.rotated(asteroid.rotation);
        if masks_collide(ship_mask, ship.pos, &rotated, asteroid.pos) {
            let size = asteroid.size;
            ship.take_damage(size.damage());
            report.impacts.push((entity.id, size));
            log::debug!(
                "Asteroid {} ({:?}) hit ship: health={:.0} shield={:.0}",
                entity.id,
                size,
                ship.health,
                ship.shield
            );
            entity.kill();
        }
    }

    // Then pickups
    for entity in arena.iter_mut() {
        if !entity.roles.collidable {
            continue;
        }
        let EntityKind::Shield(shield) = &entity.kind else {
            continue;
        };
        if masks_collide(ship_mask, ship.pos, masks.shield(shield.kind), shield.pos) {
            let kind = shield.kind;
            ship.add_shield(kind);
            report.pickups.push((entity.id, kind));
            log::debug!("Picked up {:?} shield: shield={:.0}", kind, ship.shield);
            entity.kill();
        }
    }

    if ship.is_destroyed() && ship.start_explosion() {
        log::info!("Ship destroyed");
        report.ship_destroyed = true;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Asteroid, Shield};
    use crate::tuning::ShipTuning;

    fn ship_at(pos: Vec2) -> Ship {
        Ship::new(pos, &ShipTuning::default())
    }

    fn asteroid(pos: Vec2, size: SizeClass) -> EntityKind {
        EntityKind::Asteroid(Asteroid {
            pos,
            dir: Vec2::Y,
            speed: 200.0,
            size,
            rotation: 30.0,
            rotation_rate: 25.0,
        })
    }

    fn shield(pos: Vec2, kind: ShieldKind) -> EntityKind {
        EntityKind::Shield(Shield {
            pos,
            dir: Vec2::Y,
            speed: 80.0,
            kind,
        })
    }

    #[test]
    fn test_large_asteroid_hit_removes_and_damages() {
        let masks = SpriteMasks::default();
        let mut ship = ship_at(Vec2::new(400.0, 400.0));
        let mut arena = EntityArena::new();
        let id = arena.spawn(asteroid(Vec2::new(420.0, 380.0), SizeClass::Large));

        let report = resolve_collisions(&mut ship, &mut arena, &masks);
        assert_eq!(report.impacts, vec![(id, SizeClass::Large)]);
        assert_eq!(ship.health, 94.0);
        assert_eq!(arena.asteroid_count(), 0);
        assert!(!report.ship_destroyed);
    }

    #[test]
    fn test_near_miss_on_diagonal_does_not_hit() {
        // Boxes overlap at the corners, round sprites do not
        let masks = SpriteMasks::default();
        let mut ship = ship_at(Vec2::new(400.0, 400.0));
        let mut arena = EntityArena::new();
        arena.spawn(asteroid(Vec2::new(455.0, 455.0), SizeClass::Small));

        let report = resolve_collisions(&mut ship, &mut arena, &masks);
        assert!(report.impacts.is_empty());
        assert_eq!(ship.health, 100.0);
        assert_eq!(arena.asteroid_count(), 1);
    }

    #[test]
    fn test_far_entities_are_ignored() {
        let masks = SpriteMasks::default();
        let mut ship = ship_at(Vec2::new(100.0, 600.0));
        let mut arena = EntityArena::new();
        arena.spawn(asteroid(Vec2::new(900.0, 50.0), SizeClass::Large));
        arena.spawn(shield(Vec2::new(1000.0, 50.0), ShieldKind::Permanent));
        let report = resolve_collisions(&mut ship, &mut arena, &masks);
        assert_eq!(report, CollisionReport::default());
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_pickup_applies_shield() {
        let masks = SpriteMasks::default();
        let mut ship = ship_at(Vec2::new(400.0, 400.0));
        let mut arena = EntityArena::new();
        let id = arena.spawn(shield(Vec2::new(400.0, 420.0), ShieldKind::Permanent));

        let report = resolve_collisions(&mut ship, &mut arena, &masks);
        assert_eq!(report.pickups, vec![(id, ShieldKind::Permanent)]);
        assert_eq!(ship.shield, 100.0);
        assert!(ship.has_permanent_shield());
        assert_eq!(arena.shield_count(), 0);
    }

    #[test]
    fn test_several_hits_in_one_frame() {
        let masks = SpriteMasks::default();
        let mut ship = ship_at(Vec2::new(400.0, 400.0));
        let mut arena = EntityArena::new();
        arena.spawn(asteroid(Vec2::new(390.0, 400.0), SizeClass::Small));
        arena.spawn(asteroid(Vec2::new(410.0, 400.0), SizeClass::Medium));
        let report = resolve_collisions(&mut ship, &mut arena, &masks);
        assert_eq!(report.impacts.len(), 2);
        assert_eq!(ship.health, 94.0);
    }

    #[test]
    fn test_lethal_hit_starts_explosion_once() {
        let masks = SpriteMasks::default();
        let mut ship = ship_at(Vec2::new(400.0, 400.0));
        ship.health = 5.0;
        let mut arena = EntityArena::new();
        arena.spawn(asteroid(Vec2::new(400.0, 400.0), SizeClass::Large));
        let report = resolve_collisions(&mut ship, &mut arena, &masks);
        assert!(report.ship_destroyed);
        assert!(ship.exploding);
        assert_eq!(ship.health, 0.0);

        // Exploding ships are no longer hit-tested
        arena.spawn(asteroid(Vec2::new(400.0, 400.0), SizeClass::Large));
        let report = resolve_collisions(&mut ship, &mut arena, &masks);
        assert_eq!(report, CollisionReport::default());
        assert_eq!(arena.asteroid_count(), 1);
    }

    #[test]
    fn test_masks_collide_respects_rotation() {
        // A long thin bar next to the ship only touches once rotated toward it
        let ship = CollisionMask::filled(20, 20);
        let bar = CollisionMask::filled(60, 4);
        let ship_pos = Vec2::new(100.0, 100.0);
        let bar_pos = Vec2::new(100.0, 135.0);
        assert!(!masks_collide(&ship, ship_pos, &bar, bar_pos));
        assert!(masks_collide(&ship, ship_pos, &bar.rotated(90.0), bar_pos));
    }
}
