//! Delve Arena - a small 3D arena exploration game core
//!
//! Core modules:
//! - `sim`: Per-frame simulation (kinematics, AABB collision, entity pools)
//! - `screen`: Screen lifecycle and the fading transition state machine
//! - `game`: Top-level frame loop owning camera, transition and current screen
//! - `render`: Render data handed to an external drawing collaborator
//! - `persistence`: Wallet, save slots and level records on disk
//! - `settings`: Player preferences
//! - `audio`: Fire-and-forget audio contract

pub mod audio;
pub mod game;
pub mod persistence;
pub mod render;
pub mod screen;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::Settings;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Simulation rate the per-frame constants are tuned for
    pub const SIM_HZ: f32 = 60.0;
    /// Frame delta clamp to keep a stalled frame from launching entities
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions (floor spans [-HALF, HALF] on X and Z)
    pub const ARENA_HALF_WIDTH: f32 = 16.0;
    pub const ARENA_HALF_DEPTH: f32 = 16.0;
    pub const ARENA_CEILING: f32 = 8.0;
    pub const FLOOR_TOP: f32 = 0.0;
    pub const FLOOR_THICKNESS: f32 = 1.0;
    pub const WALL_THICKNESS: f32 = 1.0;
    pub const WALL_HEIGHT: f32 = 3.0;

    /// Player defaults
    pub const PLAYER_SIZE: Vec3 = Vec3::new(1.0, 2.0, 1.0);
    pub const PLAYER_SPEED: f32 = 0.2;
    pub const PLAYER_JUMP_IMPULSE: f32 = 1.0;
    pub const PLAYER_MAX_JUMPS: u8 = 1;
    /// Frames of invulnerability after taking contact damage
    pub const PLAYER_HIT_COOLDOWN: u32 = 30;

    /// Shared kinematic tuning (per 60 Hz frame)
    pub const GRAVITY: f32 = 0.05;
    pub const TERMINAL_VELOCITY: f32 = 2.0;
    pub const AIR_FRICTION: f32 = 0.05;

    /// NPC defaults
    pub const MAX_NPCS: usize = 32;
    pub const NPC_SIZE: Vec3 = Vec3::new(1.0, 1.0, 1.0);
    pub const NPC_RADIUS: f32 = 0.5;
    pub const NPC_SPEED: f32 = 0.08;
    pub const NPC_SIGHT_RADIUS: f32 = 8.0;
    pub const NPC_CONTACT_DAMAGE: f32 = 0.1;

    /// Projectile defaults
    pub const MAX_PROJECTILES: usize = 64;
    pub const PROJECTILE_RADIUS: f32 = 0.2;
    pub const PROJECTILE_SPEED: f32 = 0.5;
    pub const PROJECTILE_TTL: u32 = 90;
    pub const PROJECTILE_DAMAGE: f32 = 0.34;
    pub const FIRE_COOLDOWN: u32 = 12;

    /// Drill room blocks
    pub const MAX_DRILL_BLOCKS: usize = 16;
    pub const DRILL_BLOCK_SIZE: Vec3 = Vec3::new(1.5, 1.5, 1.5);

    /// Pickups
    pub const PICKUP_RADIUS: f32 = 0.4;

    /// Screen transition fade (fade-out deliberately slower than fade-in)
    pub const FADE_IN_STEP: f32 = 0.05;
    pub const FADE_OUT_STEP: f32 = 0.02;

    /// Logo screen duration in frames
    pub const LOGO_FRAMES: u32 = 120;

    /// Pursuit escalation tuning
    pub const PURSUIT_BAND_LOW: f32 = 0.25;
    pub const PURSUIT_BAND_HIGH: f32 = 0.45;
    pub const PURSUIT_EXIT_MARGIN: f32 = 0.1;
    pub const PURSUIT_FRAMES_TO_ACTIVATE: u32 = 4;
    pub const PURSUIT_MAX_ACTIVE_FRAMES: u32 = 90;
    pub const PURSUIT_LERP: f32 = 0.8;

    /// Camera rig offset from the player center
    pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 8.0, 10.0);
}

/// Normalize a vector, returning zero for zero-length input instead of NaN
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    let len_sq = v.length_squared();
    if len_sq <= f32::EPSILON {
        Vec3::ZERO
    } else {
        v / len_sq.sqrt()
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    (a - b).length()
}

/// Linear interpolation from `a` (t = 0) to `b` (t = 1)
#[inline]
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Ratio with a guarded denominator (0 when `den <= 0`)
#[inline]
pub fn ratio(num: f32, den: f32) -> f32 {
    if den <= 0.0 { 0.0 } else { num / den }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_normalize_zero() {
        let n = safe_normalize(Vec3::ZERO);
        assert_eq!(n, Vec3::ZERO);
        assert!(!n.x.is_nan());
    }

    #[test]
    fn test_safe_normalize_diagonal() {
        let n = safe_normalize(Vec3::new(1.0, 0.0, 1.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_lerp_and_distance() {
        let a = Vec3::ZERO;
        let b = Vec3::new(10.0, 0.0, 0.0);
        assert_eq!(lerp(a, b, 0.8), Vec3::new(8.0, 0.0, 0.0));
        assert!((distance(a, b) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_ratio_guards_zero() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(ratio(1.0, 4.0), 0.25);
    }
}
