//! Entity types: the player, pooled NPCs/projectiles/blocks, chests and pickups
//!
//! Pooled entities are stored as parallel arrays (see `pool::SoaSlots`).

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::kinematics::{Body, KinematicParams};
use super::pool::{RingPool, SoaSlots};
use crate::consts::*;

/// Clamp a health value into [0, 1]
#[inline]
pub fn clamp_health(h: f32) -> f32 {
    if h.is_nan() { 0.0 } else { h.clamp(0.0, 1.0) }
}

/// Currency types, in wallet order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Gold,
    Silver,
    Crystal,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Gold, Currency::Silver, Currency::Crystal];
    pub const COUNT: usize = Self::ALL.len();

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Gold => "gold",
            Currency::Silver => "silver",
            Currency::Crystal => "crystal",
        }
    }
}

/// The player-controlled avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub health: f32,
    /// Last non-zero horizontal intent, used as the firing direction
    pub facing: Vec3,
    pub fire_cooldown: u32,
    /// Invulnerability frames after a hit
    pub hit_cooldown: u32,
}

impl Player {
    pub fn new(position: Vec3) -> Self {
        let mut body = Body::new(position, PLAYER_SIZE);
        body.jumps_left = KinematicParams::PLAYER.max_jumps;
        Self {
            body,
            health: 1.0,
            facing: Vec3::NEG_Z,
            fire_cooldown: 0,
            hit_cooldown: 0,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        self.body.aabb()
    }

    /// Take damage unless still invulnerable; returns true if it landed
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if self.hit_cooldown > 0 {
            return false;
        }
        self.health = clamp_health(self.health - amount);
        self.hit_cooldown = PLAYER_HIT_COOLDOWN;
        true
    }

    pub fn tick_cooldowns(&mut self) {
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
        self.hit_cooldown = self.hit_cooldown.saturating_sub(1);
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// NPC archetypes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpcKind {
    #[default]
    Slime,
    Bat,
    Golem,
}

impl NpcKind {
    /// Multiplier applied to incoming projectile damage
    pub fn damage_taken(&self) -> f32 {
        match self {
            NpcKind::Slime => 1.0,
            NpcKind::Bat => 1.5,
            NpcKind::Golem => 0.5,
        }
    }

    pub fn speed_scale(&self) -> f32 {
        match self {
            NpcKind::Slime => 0.8,
            NpcKind::Bat => 1.4,
            NpcKind::Golem => 0.6,
        }
    }
}

/// What an NPC is doing this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NpcAction {
    #[default]
    Idle,
    Wander,
    Chase,
    Stunned,
}

/// NPC state bitmask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcFlags(pub u8);

impl NpcFlags {
    pub const HOSTILE: u8 = 1 << 0;
    pub const CHASING: u8 = 1 << 1;
    pub const STUNNED: u8 = 1 << 2;
    /// Touched the player this frame
    pub const CONTACT: u8 = 1 << 3;

    #[inline]
    pub fn contains(&self, bit: u8) -> bool {
        self.0 & bit != 0
    }

    #[inline]
    pub fn set(&mut self, bit: u8, on: bool) {
        if on {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }
}

/// Stun frames after a projectile hit
pub const NPC_STUN_FRAMES: u32 = 20;

/// NPC parallel arrays
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcSlots {
    pub active: Vec<bool>,
    pub position: Vec<Vec3>,
    pub size: Vec<Vec3>,
    pub velocity: Vec<Vec3>,
    pub airtime: Vec<u32>,
    pub health: Vec<f32>,
    pub kind: Vec<NpcKind>,
    pub action: Vec<NpcAction>,
    pub flags: Vec<NpcFlags>,
    /// Wander heading or stun countdown, depending on action
    pub heading: Vec<Vec3>,
    pub timer: Vec<u32>,
}

impl NpcSlots {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            active: vec![false; n],
            position: vec![Vec3::ZERO; n],
            size: vec![Vec3::ZERO; n],
            velocity: vec![Vec3::ZERO; n],
            airtime: vec![0; n],
            health: vec![0.0; n],
            kind: vec![NpcKind::default(); n],
            action: vec![NpcAction::default(); n],
            flags: vec![NpcFlags::default(); n],
            heading: vec![Vec3::ZERO; n],
            timer: vec![0; n],
        }
    }

    /// Gather one slot into a `Body` for the kinematic step
    pub fn body(&self, slot: usize) -> Body {
        Body {
            position: self.position[slot],
            size: self.size[slot],
            velocity: self.velocity[slot],
            airtime: self.airtime[slot],
            jumps_left: 0,
        }
    }

    pub fn store_body(&mut self, slot: usize, body: &Body) {
        self.position[slot] = body.position;
        self.velocity[slot] = body.velocity;
        self.airtime[slot] = body.airtime;
    }

    pub fn aabb(&self, slot: usize) -> Aabb {
        Aabb::from_center_size(self.position[slot], self.size[slot])
    }

    /// Apply projectile damage; deactivates the slot at zero health
    pub fn damage(&mut self, slot: usize, amount: f32) -> bool {
        let scaled = amount * self.kind[slot].damage_taken();
        self.health[slot] = clamp_health(self.health[slot] - scaled);
        self.action[slot] = NpcAction::Stunned;
        self.flags[slot].set(NpcFlags::STUNNED, true);
        self.timer[slot] = NPC_STUN_FRAMES;
        if self.health[slot] <= 0.0 {
            self.active[slot] = false;
            return true;
        }
        false
    }
}

impl SoaSlots for NpcSlots {
    fn capacity(&self) -> usize {
        self.active.len()
    }

    fn clear_slot(&mut self, slot: usize) {
        self.active[slot] = false;
        self.position[slot] = Vec3::ZERO;
        self.size[slot] = Vec3::ZERO;
        self.velocity[slot] = Vec3::ZERO;
        self.airtime[slot] = 0;
        self.health[slot] = 0.0;
        self.kind[slot] = NpcKind::default();
        self.action[slot] = NpcAction::default();
        self.flags[slot] = NpcFlags::default();
        self.heading[slot] = Vec3::ZERO;
        self.timer[slot] = 0;
    }

    fn is_active(&self, slot: usize) -> bool {
        self.active[slot]
    }
}

pub type NpcPool = RingPool<NpcSlots>;

pub fn npc_pool() -> NpcPool {
    RingPool::new(NpcSlots::with_capacity(MAX_NPCS))
}

/// Spawn a hostile NPC standing on the floor at `(x, z)`
pub fn emit_npc(pool: &mut NpcPool, kind: NpcKind, x: f32, z: f32) -> usize {
    pool.emit(|s, i| {
        s.active[i] = true;
        s.position[i] = Vec3::new(x, FLOOR_TOP + NPC_SIZE.y / 2.0, z);
        s.size[i] = NPC_SIZE;
        s.health[i] = 1.0;
        s.kind[i] = kind;
        s.flags[i].set(NpcFlags::HOSTILE, true);
    })
}

/// Projectile parallel arrays
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileSlots {
    pub active: Vec<bool>,
    pub position: Vec<Vec3>,
    /// Unit direction of travel
    pub direction: Vec<Vec3>,
    pub ttl: Vec<u32>,
}

impl ProjectileSlots {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            active: vec![false; n],
            position: vec![Vec3::ZERO; n],
            direction: vec![Vec3::ZERO; n],
            ttl: vec![0; n],
        }
    }

    pub fn aabb(&self, slot: usize) -> Aabb {
        Aabb::from_center_size(self.position[slot], Vec3::splat(PROJECTILE_RADIUS * 2.0))
    }
}

impl SoaSlots for ProjectileSlots {
    fn capacity(&self) -> usize {
        self.active.len()
    }

    fn clear_slot(&mut self, slot: usize) {
        self.active[slot] = false;
        self.position[slot] = Vec3::ZERO;
        self.direction[slot] = Vec3::ZERO;
        self.ttl[slot] = 0;
    }

    fn is_active(&self, slot: usize) -> bool {
        self.active[slot]
    }
}

pub type ProjectilePool = RingPool<ProjectileSlots>;

pub fn projectile_pool() -> ProjectilePool {
    RingPool::new(ProjectileSlots::with_capacity(MAX_PROJECTILES))
}

pub fn emit_projectile(pool: &mut ProjectilePool, origin: Vec3, direction: Vec3) -> usize {
    pool.emit(|s, i| {
        s.active[i] = true;
        s.position[i] = origin;
        s.direction[i] = crate::safe_normalize(direction);
        s.ttl[i] = PROJECTILE_TTL;
    })
}

/// Material state of a drill block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockMaterial {
    #[default]
    Intact,
    Cracked,
    Broken,
}

impl BlockMaterial {
    pub fn from_health(health: f32) -> Self {
        if health <= 0.0 {
            BlockMaterial::Broken
        } else if health < 0.5 {
            BlockMaterial::Cracked
        } else {
            BlockMaterial::Intact
        }
    }
}

/// Drill block parallel arrays
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockSlots {
    pub active: Vec<bool>,
    pub position: Vec<Vec3>,
    pub size: Vec<Vec3>,
    pub health: Vec<f32>,
    pub material: Vec<BlockMaterial>,
}

impl BlockSlots {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            active: vec![false; n],
            position: vec![Vec3::ZERO; n],
            size: vec![Vec3::ZERO; n],
            health: vec![0.0; n],
            material: vec![BlockMaterial::default(); n],
        }
    }

    pub fn aabb(&self, slot: usize) -> Aabb {
        Aabb::from_center_size(self.position[slot], self.size[slot])
    }

    /// Chip a block; returns the new material
    pub fn damage(&mut self, slot: usize, amount: f32) -> BlockMaterial {
        self.health[slot] = clamp_health(self.health[slot] - amount);
        let material = BlockMaterial::from_health(self.health[slot]);
        self.material[slot] = material;
        if material == BlockMaterial::Broken {
            self.active[slot] = false;
        }
        material
    }
}

impl SoaSlots for BlockSlots {
    fn capacity(&self) -> usize {
        self.active.len()
    }

    fn clear_slot(&mut self, slot: usize) {
        self.active[slot] = false;
        self.position[slot] = Vec3::ZERO;
        self.size[slot] = Vec3::ZERO;
        self.health[slot] = 0.0;
        self.material[slot] = BlockMaterial::default();
    }

    fn is_active(&self, slot: usize) -> bool {
        self.active[slot]
    }
}

pub type BlockPool = RingPool<BlockSlots>;

pub fn block_pool() -> BlockPool {
    RingPool::new(BlockSlots::with_capacity(MAX_DRILL_BLOCKS))
}

pub fn emit_block(pool: &mut BlockPool, position: Vec3) -> usize {
    pool.emit(|s, i| {
        s.active[i] = true;
        s.position[i] = position;
        s.size[i] = DRILL_BLOCK_SIZE;
        s.health[i] = 1.0;
        s.material[i] = BlockMaterial::Intact;
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestState {
    Full,
    Empty,
}

/// A gold chest: a static prop that pays out once when touched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chest {
    pub position: Vec3,
    pub size: Vec3,
    pub state: ChestState,
    pub currency: Currency,
    pub amount: u32,
}

impl Chest {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.size)
    }

    /// Empty the chest, returning its payout if it was still full
    pub fn open(&mut self) -> Option<(Currency, u32)> {
        match self.state {
            ChestState::Full => {
                self.state = ChestState::Empty;
                Some((self.currency, self.amount))
            }
            ChestState::Empty => None,
        }
    }
}

/// A floating currency item collected by touch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub position: Vec3,
    pub currency: Currency,
    pub amount: u32,
    pub active: bool,
}
