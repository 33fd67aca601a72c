//! Deterministic arena simulation
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Fixed per-frame stepping scaled by a clamped dt
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering, audio or storage dependencies

pub mod aabb;
pub mod collision;
pub mod entity;
pub mod kinematics;
pub mod pool;
pub mod pursuit;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use collision::{
    Arena, Collider, CollisionFlags, CollisionWorld, Contact, ResolveMode, StepOutcome, detect,
    step_body,
};
pub use entity::{
    BlockMaterial, Chest, ChestState, Currency, NpcAction, NpcFlags, NpcKind, Pickup, Player,
};
pub use kinematics::{Body, KinematicParams};
pub use pool::{RingCursor, RingPool, SoaSlots};
pub use pursuit::{PursuitConfig, PursuitPhase, PursuitTracker};
pub use state::{ArenaKind, ArenaOutcome, ArenaState, GameEvent};
pub use tick::{TickInput, tick};
