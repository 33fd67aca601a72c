//! Velocity integration shared by the player, NPCs and projectiles
//!
//! Order of operations per frame:
//! 1. intent is normalized (zero stays zero)
//! 2. frame movement = intent + velocity
//! 3. position += frame movement * magnitude
//! 4. gravity pulls velocity.y down, clamped at terminal velocity
//! 5. horizontal velocity decays toward zero by the air friction amount
//!
//! Vertical settling (step 5 of the collision pass) happens in `settle` once the
//! collision flags for the frame are known.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::consts::*;
use crate::safe_normalize;

/// Per-entity-kind movement tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicParams {
    /// Movement magnitude per 60 Hz frame
    pub speed: f32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub air_friction: f32,
    pub jump_impulse: f32,
    pub max_jumps: u8,
}

impl KinematicParams {
    pub const PLAYER: Self = Self {
        speed: PLAYER_SPEED,
        gravity: GRAVITY,
        terminal_velocity: TERMINAL_VELOCITY,
        air_friction: AIR_FRICTION,
        jump_impulse: PLAYER_JUMP_IMPULSE,
        max_jumps: PLAYER_MAX_JUMPS,
    };

    pub const NPC: Self = Self {
        speed: NPC_SPEED,
        gravity: GRAVITY,
        terminal_velocity: TERMINAL_VELOCITY,
        air_friction: AIR_FRICTION,
        jump_impulse: 0.0,
        max_jumps: 0,
    };

    /// Projectiles fly straight: no gravity, no drag
    pub const PROJECTILE: Self = Self {
        speed: PROJECTILE_SPEED,
        gravity: 0.0,
        terminal_velocity: 0.0,
        air_friction: 0.0,
        jump_impulse: 0.0,
        max_jumps: 0,
    };

    /// Movement magnitude for a real frame delta
    #[inline]
    pub fn magnitude(&self, dt: f32) -> f32 {
        self.speed * dt.clamp(0.0, MAX_FRAME_DT) * SIM_HZ
    }
}

/// Position, extents and velocity of a moving entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Center of the entity
    pub position: Vec3,
    /// Full extents
    pub size: Vec3,
    pub velocity: Vec3,
    /// Frames since last vertical contact
    pub airtime: u32,
    pub jumps_left: u8,
}

impl Body {
    pub fn new(position: Vec3, size: Vec3) -> Self {
        Self {
            position,
            size,
            velocity: Vec3::ZERO,
            airtime: 0,
            jumps_left: 0,
        }
    }

    /// Bounding box derived from the current position and size
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.size)
    }

    /// Advance one frame of movement (steps 1-4 and 6)
    pub fn integrate(&mut self, intent: Vec3, params: &KinematicParams, magnitude: f32) {
        let intent = if intent == Vec3::ZERO {
            Vec3::ZERO
        } else {
            safe_normalize(intent)
        };

        let frame_movement = intent + self.velocity;
        self.position += frame_movement * magnitude;

        if params.gravity != 0.0 {
            self.velocity.y = (self.velocity.y - params.gravity).max(-params.terminal_velocity);
        }

        self.velocity.x = approach_zero(self.velocity.x, params.air_friction);
        self.velocity.z = approach_zero(self.velocity.z, params.air_friction);
    }

    /// Apply the vertical outcome of the collision pass
    pub fn settle(&mut self, vertical_hit: bool, on_floor: bool, params: &KinematicParams) {
        if vertical_hit || on_floor {
            self.velocity.y = 0.0;
            self.airtime = 0;
        } else {
            self.airtime = self.airtime.saturating_add(1);
        }
        if on_floor {
            self.jumps_left = params.max_jumps;
        }
    }

    /// Spend a jump if one is left
    pub fn jump(&mut self, params: &KinematicParams) -> bool {
        if self.jumps_left == 0 {
            return false;
        }
        self.jumps_left -= 1;
        self.velocity.y = params.jump_impulse;
        self.airtime = 0;
        true
    }
}

/// Move `v` toward zero by `amount` without crossing it
#[inline]
fn approach_zero(v: f32, amount: f32) -> f32 {
    if v > 0.0 {
        (v - amount).max(0.0)
    } else if v < 0.0 {
        (v + amount).min(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-6
    }

    #[test]
    fn test_integrate_from_rest() {
        let mut body = Body::new(Vec3::ZERO, Vec3::ONE);
        body.integrate(Vec3::X, &KinematicParams::PLAYER, 0.2);
        assert!(approx(body.position, Vec3::new(0.2, 0.0, 0.0)));
        // Gravity lands in velocity for the next frame
        assert!((body.velocity.y + GRAVITY).abs() < 1e-6);
    }

    #[test]
    fn test_diagonal_intent_not_faster() {
        let mut straight = Body::new(Vec3::ZERO, Vec3::ONE);
        let mut diagonal = Body::new(Vec3::ZERO, Vec3::ONE);
        let params = KinematicParams::PROJECTILE;
        straight.integrate(Vec3::X, &params, 1.0);
        diagonal.integrate(Vec3::new(1.0, 0.0, 1.0), &params, 1.0);
        assert!((straight.position.length() - diagonal.position.length()).abs() < 1e-6);
    }

    #[test]
    fn test_terminal_velocity_clamp() {
        let mut body = Body::new(Vec3::ZERO, Vec3::ONE);
        for _ in 0..200 {
            body.integrate(Vec3::ZERO, &KinematicParams::PLAYER, 0.2);
        }
        assert_eq!(body.velocity.y, -TERMINAL_VELOCITY);
    }

    #[test]
    fn test_friction_never_reverses() {
        let mut body = Body::new(Vec3::ZERO, Vec3::ONE);
        body.velocity = Vec3::new(0.07, 0.0, -0.03);
        body.integrate(Vec3::ZERO, &KinematicParams::PLAYER, 0.0);
        assert!((body.velocity.x - 0.02).abs() < 1e-6);
        assert_eq!(body.velocity.z, 0.0);
        body.integrate(Vec3::ZERO, &KinematicParams::PLAYER, 0.0);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn test_jump_consumes_and_refills() {
        let params = KinematicParams::PLAYER;
        let mut body = Body::new(Vec3::ZERO, Vec3::ONE);
        body.settle(false, true, &params);
        assert_eq!(body.jumps_left, 1);

        assert!(body.jump(&params));
        assert_eq!(body.velocity.y, PLAYER_JUMP_IMPULSE);
        assert!(!body.jump(&params));

        body.settle(false, false, &params);
        assert_eq!(body.airtime, 1);
        body.settle(false, true, &params);
        assert_eq!(body.airtime, 0);
        assert_eq!(body.jumps_left, 1);
    }

    #[test]
    fn test_magnitude_scales_with_dt() {
        let params = KinematicParams::PLAYER;
        assert!((params.magnitude(1.0 / 60.0) - PLAYER_SPEED).abs() < 1e-6);
        assert!((params.magnitude(1.0 / 30.0) - 2.0 * PLAYER_SPEED).abs() < 1e-6);
        // Stalled frames are clamped
        assert_eq!(params.magnitude(5.0), params.magnitude(MAX_FRAME_DT));
    }
}
