//! Collision detection and revert-all resolution
//!
//! Each moving entity is integrated to a tentative position, its box is tested
//! against the arena bounds, static geometry and dynamic colliders, and any
//! blocking hit reverts the whole body to where it started the frame. There is
//! no axis-by-axis sliding: walls rubber-band the player instead of guiding it.
//!
//! The floor is support rather than an obstacle. Touching it rests the body on
//! the floor top and zeroes vertical velocity.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::kinematics::{Body, KinematicParams};
use crate::consts::*;
use crate::lerp;

/// Per-frame collision flags, recomputed from scratch every step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFlags {
    /// -1 = hit on the entity's min side, +1 = hit on its max side
    pub x: i8,
    pub y: i8,
    pub z: i8,
    /// Floor contact ("W")
    pub floor: bool,
    /// Tentative box crossed the arena's outer bounds
    pub out_of_bounds: bool,
}

impl CollisionFlags {
    /// Any axis flag fired (arena walls, statics or dynamics)
    #[inline]
    pub fn blocking(&self) -> bool {
        self.x != 0 || self.y != 0 || self.z != 0
    }

    pub fn axis(&self, axis: usize) -> i8 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    fn set_axis(&mut self, axis: usize, sign: i8) {
        match axis {
            0 => self.x = sign,
            1 => self.y = sign,
            _ => self.z = sign,
        }
    }
}

/// The playable volume and the floor slab under it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    /// Interior volume bounded by the outer walls and the ceiling
    pub bounds: Aabb,
    pub floor: Aabb,
}

impl Arena {
    pub fn new(half_width: f32, half_depth: f32, ceiling: f32) -> Self {
        let bounds = Aabb::new(
            Vec3::new(-half_width, FLOOR_TOP, -half_depth),
            Vec3::new(half_width, ceiling, half_depth),
        );
        let floor = Aabb::from_center_size(
            Vec3::new(0.0, FLOOR_TOP - FLOOR_THICKNESS / 2.0, 0.0),
            Vec3::new(half_width * 2.0, FLOOR_THICKNESS, half_depth * 2.0),
        );
        Self { bounds, floor }
    }

    #[inline]
    pub fn floor_top(&self) -> f32 {
        self.floor.max.y
    }

    /// Flags for the arena walls and ceiling; the floor is reported separately
    pub fn boundary_flags(&self, aabb: &Aabb) -> CollisionFlags {
        let mut flags = CollisionFlags::default();
        for axis in [0, 2] {
            if aabb.min[axis] <= self.bounds.min[axis] {
                flags.set_axis(axis, -1);
            } else if aabb.max[axis] >= self.bounds.max[axis] {
                flags.set_axis(axis, 1);
            }
        }
        if aabb.max.y >= self.bounds.max.y {
            flags.y = 1;
        }
        flags.out_of_bounds = flags.blocking();
        flags.floor = aabb.min.y <= self.floor_top() && aabb.intersects(&self.floor);
        flags
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ARENA_HALF_WIDTH, ARENA_HALF_DEPTH, ARENA_CEILING)
    }
}

/// A dynamic obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    Box(Aabb),
    /// Round obstacles use the box-vs-sphere test
    Sphere { center: Vec3, radius: f32 },
}

impl Collider {
    pub fn hits(&self, aabb: &Aabb) -> bool {
        match *self {
            Collider::Box(b) => aabb.intersects(&b),
            Collider::Sphere { center, radius } => aabb.intersects_sphere(center, radius),
        }
    }

    /// Bounding box used to decide which axis was crossed
    pub fn bounds(&self) -> Aabb {
        match *self {
            Collider::Box(b) => b,
            Collider::Sphere { center, radius } => {
                Aabb::from_center_size(center, Vec3::splat(radius * 2.0))
            }
        }
    }
}

/// Everything a body can run into this frame
#[derive(Debug, Clone, Copy)]
pub struct CollisionWorld<'a> {
    pub arena: &'a Arena,
    /// Walls, boxes, chests
    pub statics: &'a [Aabb],
    pub dynamics: &'a [Collider],
}

/// Detection result for one tentative box
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Contact {
    pub flags: CollisionFlags,
    /// Index into `statics` of the first static hit
    pub static_hit: Option<usize>,
    /// Index into `dynamics` of the first dynamic hit
    pub dynamic_hit: Option<usize>,
}

/// How a blocked body is put back
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolveMode {
    /// Snap to the pre-frame position
    Revert,
    /// Interpolate from the tentative position back toward the pre-frame one.
    /// The eased box must be clear of everything, and leaving the arena always
    /// reverts.
    Ease(f32),
}

/// Outcome of `step_body`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub contact: Contact,
    pub reverted: bool,
    /// Position before the step
    pub old_position: Vec3,
}

impl StepOutcome {
    #[inline]
    pub fn flags(&self) -> CollisionFlags {
        self.contact.flags
    }
}

/// Signed flags for `tentative` running into `other`, given where it came from
fn obstacle_axis_flags(old: &Aabb, tentative: &Aabb, other: &Aabb) -> [i8; 3] {
    let sign_for = |axis: usize| -> i8 {
        if tentative.center()[axis] <= other.center()[axis] {
            1
        } else {
            -1
        }
    };

    let mut flags = [0i8; 3];
    let mut crossed = false;
    for (axis, flag) in flags.iter_mut().enumerate() {
        if !old.overlaps_axis(other, axis) && tentative.overlaps_axis(other, axis) {
            *flag = sign_for(axis);
            crossed = true;
        }
    }

    if !crossed {
        // Already embedded before the step: report the shallowest axis
        let depth = |axis: usize| {
            (tentative.max[axis].min(other.max[axis]) - tentative.min[axis].max(other.min[axis]))
                .max(0.0)
        };
        let axis = (0..3)
            .min_by(|&a, &b| depth(a).total_cmp(&depth(b)))
            .unwrap_or(0);
        flags[axis] = sign_for(axis);
    }
    flags
}

fn merge(flags: &mut CollisionFlags, axes: [i8; 3]) {
    for (axis, sign) in axes.into_iter().enumerate() {
        if sign != 0 && flags.axis(axis) == 0 {
            flags.set_axis(axis, sign);
        }
    }
}

/// Test a tentative box against the whole collision world
pub fn detect(old: &Aabb, tentative: &Aabb, world: &CollisionWorld<'_>) -> Contact {
    let mut contact = Contact {
        flags: world.arena.boundary_flags(tentative),
        ..Default::default()
    };

    for (i, wall) in world.statics.iter().enumerate() {
        if tentative.intersects(wall) {
            merge(&mut contact.flags, obstacle_axis_flags(old, tentative, wall));
            contact.static_hit.get_or_insert(i);
        }
    }

    for (i, collider) in world.dynamics.iter().enumerate() {
        if collider.hits(tentative) {
            merge(
                &mut contact.flags,
                obstacle_axis_flags(old, tentative, &collider.bounds()),
            );
            contact.dynamic_hit.get_or_insert(i);
        }
    }

    contact
}

/// Integrate a body one frame and resolve it against the world
pub fn step_body(
    body: &mut Body,
    intent: Vec3,
    params: &KinematicParams,
    magnitude: f32,
    world: &CollisionWorld<'_>,
    mode: ResolveMode,
) -> StepOutcome {
    let old = *body;
    body.integrate(intent, params, magnitude);

    let contact = detect(&old.aabb(), &body.aabb(), world);
    let flags = contact.flags;

    let reverted = flags.blocking();
    if reverted {
        body.position = match mode {
            ResolveMode::Ease(t) if !flags.out_of_bounds => {
                let eased = Body {
                    position: lerp(body.position, old.position, t),
                    ..*body
                };
                // Only a clear eased box is kept; otherwise fall back to the prior position
                if detect(&old.aabb(), &eased.aabb(), world).flags.blocking() {
                    old.position
                } else {
                    eased.position
                }
            }
            _ => old.position,
        };
    } else if flags.floor {
        let rest_y = world.arena.floor_top() + body.size.y / 2.0;
        if body.position.y < rest_y {
            body.position.y = rest_y;
        }
    }

    body.settle(flags.y != 0, flags.floor, params);

    StepOutcome {
        contact,
        reverted,
        old_position: old.position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resting_player(x: f32) -> Body {
        Body::new(
            Vec3::new(x, FLOOR_TOP + PLAYER_SIZE.y / 2.0, 0.0),
            PLAYER_SIZE,
        )
    }

    #[test]
    fn test_free_move_is_accepted() {
        let arena = Arena::default();
        let world = CollisionWorld {
            arena: &arena,
            statics: &[],
            dynamics: &[],
        };
        let mut body = resting_player(0.0);
        let out = step_body(&mut body, Vec3::X, &KinematicParams::PLAYER, 0.2, &world, ResolveMode::Revert);
        assert!(!out.reverted);
        assert!(out.flags().floor);
        assert!((body.position.x - 0.2).abs() < 1e-6);
        // Rested on the floor, gravity cancelled
        assert_eq!(body.position.y, FLOOR_TOP + PLAYER_SIZE.y / 2.0);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_touching_positive_x_wall_reverts() {
        let arena = Arena::default();
        let world = CollisionWorld {
            arena: &arena,
            statics: &[],
            dynamics: &[],
        };
        // After a 0.2 step the box max.x lands exactly on the wall plane
        let start_x = ARENA_HALF_WIDTH - PLAYER_SIZE.x / 2.0 - 0.25;
        let mut body = resting_player(start_x);
        let before = body.position;
        let out = step_body(&mut body, Vec3::X, &KinematicParams::PLAYER, 0.25, &world, ResolveMode::Revert);
        assert_eq!(out.flags().x, 1);
        assert!(out.flags().out_of_bounds);
        assert!(out.reverted);
        assert_eq!(body.position, before);
    }

    #[test]
    fn test_static_box_hit_sets_signed_flag() {
        let arena = Arena::default();
        let crate_box = Aabb::from_center_size(Vec3::new(-2.0, 1.0, 0.0), Vec3::splat(2.0));
        let statics = [crate_box];
        let world = CollisionWorld {
            arena: &arena,
            statics: &statics,
            dynamics: &[],
        };
        // Player to the right of the box moving left: hits on its min side
        let mut body = resting_player(-0.4);
        let before = body.position;
        let out = step_body(&mut body, -Vec3::X, &KinematicParams::PLAYER, 0.2, &world, ResolveMode::Revert);
        assert_eq!(out.flags().x, -1);
        assert!(!out.flags().out_of_bounds);
        assert_eq!(out.contact.static_hit, Some(0));
        assert_eq!(body.position, before);
    }

    #[test]
    fn test_sphere_dynamic_hit() {
        let arena = Arena::default();
        let dynamics = [Collider::Sphere {
            center: Vec3::new(1.1, 1.0, 0.0),
            radius: 0.5,
        }];
        let world = CollisionWorld {
            arena: &arena,
            statics: &[],
            dynamics: &dynamics,
        };
        let mut body = resting_player(0.0);
        let out = step_body(&mut body, Vec3::X, &KinematicParams::PLAYER, 0.2, &world, ResolveMode::Revert);
        assert_eq!(out.contact.dynamic_hit, Some(0));
        assert_eq!(out.flags().x, 1);
        assert_eq!(body.position.x, 0.0);
    }

    #[test]
    fn test_ease_mode_interpolates() {
        let arena = Arena::default();
        let statics = [Aabb::from_center_size(Vec3::new(1.5, 1.0, 0.0), Vec3::ONE)];
        let world = CollisionWorld {
            arena: &arena,
            statics: &statics,
            dynamics: &[],
        };
        let mut body = resting_player(0.0);
        let out = step_body(&mut body, Vec3::X, &KinematicParams::PLAYER, 0.5, &world, ResolveMode::Ease(0.8));
        assert!(out.reverted);
        // 0.5 tentative, eased 80% back toward 0.0
        assert!((body.position.x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_ease_never_leaves_the_arena() {
        let arena = Arena::default();
        let world = CollisionWorld {
            arena: &arena,
            statics: &[],
            dynamics: &[],
        };
        let mut body = resting_player(ARENA_HALF_WIDTH - PLAYER_SIZE.x / 2.0 - 0.1);
        for _ in 0..90 {
            step_body(&mut body, Vec3::X, &KinematicParams::PLAYER, 0.2, &world, ResolveMode::Ease(PURSUIT_LERP));
            assert!(body.aabb().max.x < arena.bounds.max.x);
        }
    }

    #[test]
    fn test_ease_never_embeds_in_a_wall() {
        let arena = Arena::default();
        let wall = Aabb::from_center_size(Vec3::new(2.5, 1.0, 0.0), Vec3::new(1.0, 2.0, 4.0));
        let statics = [wall];
        let world = CollisionWorld {
            arena: &arena,
            statics: &statics,
            dynamics: &[],
        };
        let mut body = resting_player(0.0);
        for _ in 0..20 {
            step_body(&mut body, Vec3::X, &KinematicParams::PLAYER, 0.2, &world, ResolveMode::Ease(PURSUIT_LERP));
            assert!(!body.aabb().intersects(&wall));
        }

        // Still free to walk away afterwards
        let pressed = body.position.x;
        for _ in 0..10 {
            let out = step_body(&mut body, -Vec3::X, &KinematicParams::PLAYER, 0.2, &world, ResolveMode::Revert);
            assert!(!out.reverted);
        }
        assert!((pressed - body.position.x - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_ceiling_zeroes_vertical_velocity() {
        let arena = Arena::new(10.0, 10.0, 3.0);
        let world = CollisionWorld {
            arena: &arena,
            statics: &[],
            dynamics: &[],
        };
        let mut body = Body::new(Vec3::new(0.0, 1.9, 0.0), PLAYER_SIZE);
        body.velocity.y = 1.0;
        let out = step_body(&mut body, Vec3::ZERO, &KinematicParams::PLAYER, 0.2, &world, ResolveMode::Revert);
        assert_eq!(out.flags().y, 1);
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.position.y, 1.9);
    }

    #[test]
    fn test_flags_do_not_accumulate() {
        let arena = Arena::default();
        let world = CollisionWorld {
            arena: &arena,
            statics: &[],
            dynamics: &[],
        };
        let start_x = ARENA_HALF_WIDTH - PLAYER_SIZE.x / 2.0 - 0.1;
        let mut body = resting_player(start_x);
        let hit = step_body(&mut body, Vec3::X, &KinematicParams::PLAYER, 0.2, &world, ResolveMode::Revert);
        assert_eq!(hit.flags().x, 1);
        let away = step_body(&mut body, -Vec3::X, &KinematicParams::PLAYER, 0.2, &world, ResolveMode::Revert);
        assert_eq!(away.flags().x, 0);
        assert!(!away.reverted);
    }
}
