//! Collision Detection
//!
//! Axis-aligned box overlap between movers and the entities around them.
//! A mover is tested at its prospective position (current position plus this
//! tick's velocity) before the move is committed. Scans run in store order and
//! stop at the first relevant hit.

use crate::core::fixed::Fixed;
use crate::core::vec2::FixedVec2;
use crate::game::state::{Bounds, World};

/// Box in world pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aabb {
    /// Left
    pub x: Fixed,
    /// Top
    pub y: Fixed,
    /// Width
    pub w: Fixed,
    /// Height
    pub h: Fixed,
}

impl Aabb {
    /// Box of an entity standing at `pos`.
    #[inline]
    pub fn at(pos: FixedVec2, bounds: Bounds) -> Self {
        Self {
            x: pos.x + bounds.x,
            y: pos.y + bounds.y,
            w: bounds.w,
            h: bounds.h,
        }
    }

    /// Strict overlap. Boxes that only share an edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// What the player ran into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerHit {
    /// Index into `world.items`
    Item(usize),
    /// Index into `world.pursuers` (always a living one)
    Pursuer(usize),
}

/// First entity the player would overlap at `moved`.
///
/// Active items are scanned before pursuers. Eaten pursuers are no
/// obstruction and are skipped.
pub fn player_hit(world: &World, moved: FixedVec2) -> Option<PlayerHit> {
    let probe = Aabb::at(moved, Bounds::PLAYER);

    for (index, item) in world.items.iter().enumerate() {
        if item.active && probe.intersects(&Aabb::at(item.position, Bounds::ITEM)) {
            return Some(PlayerHit::Item(index));
        }
    }

    world
        .pursuers
        .iter()
        .position(|p| p.alive && probe.intersects(&Aabb::at(p.position, Bounds::PURSUER)))
        .map(PlayerHit::Pursuer)
}

/// Would a pursuer moved to `moved` overlap the player?
///
/// Items and other pursuers never stop a pursuer, so only the player counts.
pub fn pursuer_hits_player(world: &World, moved: FixedVec2) -> bool {
    Aabb::at(moved, Bounds::PURSUER).intersects(&Aabb::at(world.player.position, Bounds::PLAYER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::level::LevelData;
    use crate::game::state::GameProgress;
    use crate::game::tick::SimConfig;

    fn px(x: i32, y: i32) -> FixedVec2 {
        FixedVec2::from_ints(x, y)
    }

    const LEVEL: &str = "1 1
XXXXXX
X..QQX
XQQQPX
XXXXXX";

    fn world() -> World {
        let level = LevelData::parse_sized(LEVEL, 6, 4).unwrap();
        World::new(&level, 1, GameProgress::new(3), &SimConfig::default())
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::at(px(0, 0), Bounds::pixels(0, 0, 40, 40));
        let b = Aabb::at(px(40, 0), Bounds::pixels(0, 0, 40, 40));
        assert!(!a.intersects(&b));

        let c = Aabb::at(px(39, 39), Bounds::pixels(0, 0, 40, 40));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn test_player_reaches_item_centre() {
        let w = world();
        // item at (2,1); its 2px dot starts at x = 99
        assert_eq!(player_hit(&w, px(44, 40)), None);
        assert_eq!(player_hit(&w, px(60, 40)), None);
        assert_eq!(player_hit(&w, px(64, 40)), Some(PlayerHit::Item(0)));
    }

    #[test]
    fn test_consumed_item_is_ignored() {
        let mut w = world();
        w.items[0].active = false;
        assert_eq!(player_hit(&w, px(64, 40)), None);
    }

    #[test]
    fn test_dead_pursuer_is_no_obstruction() {
        let mut w = world();
        // pursuer spawn (4,2) = (160,80); player one tile above
        let near = px(160, 44);
        assert_eq!(player_hit(&w, near), Some(PlayerHit::Pursuer(0)));
        w.pursuers[0].alive = false;
        assert_eq!(player_hit(&w, near), None);
    }

    #[test]
    fn test_pursuer_probe_sees_player() {
        let mut w = world();
        w.player.position = px(120, 80);
        // player box spans x 121..159
        assert!(!pursuer_hits_player(&w, px(160, 80)));
        assert!(!pursuer_hits_player(&w, px(155, 80)));
        assert!(pursuer_hits_player(&w, px(150, 80)));
    }
}
