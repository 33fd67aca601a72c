//! Arena world state
//!
//! One `ArenaState` is owned by the gameplay or drill screen between its init
//! and unload. It holds the static geometry, the player and the entity pools.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::aabb::Aabb;
use super::collision::{Arena, StepOutcome};
use super::entity::*;
use super::pursuit::PursuitTracker;
use crate::consts::*;

/// Which layout an arena was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaKind {
    Dungeon,
    Drill,
}

/// How the arena run stands after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArenaOutcome {
    #[default]
    Continue,
    /// Player health reached zero
    Defeated,
    /// Every chest and pickup collected
    Cleared,
    /// Player stepped on the drill pad
    EnterDrill,
}

/// Things that happened during a tick, for audio and logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Jumped,
    Fired,
    Bumped,
    PickedUp { currency: Currency, amount: u32 },
    ChestOpened { currency: Currency, amount: u32 },
    PlayerHit,
    NpcDefeated,
    BlockCracked,
    BlockBroken,
    DangerStarted,
    WaveRespawned,
}

/// Drill room blocks per wave
pub const DRILL_WAVE_SIZE: usize = 8;
/// Crystal paid per broken drill block
pub const DRILL_BLOCK_PAYOUT: u32 = 1;
/// Gold held by each dungeon chest
pub const CHEST_PAYOUT: u32 = 25;

const DUNGEON_NPCS: usize = 6;
const DUNGEON_PICKUPS: usize = 12;
const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, FLOOR_TOP + PLAYER_SIZE.y / 2.0, 10.0);
const DRILL_SPAWN: Vec3 = Vec3::new(0.0, FLOOR_TOP + PLAYER_SIZE.y / 2.0, 5.0);

/// Complete arena simulation state
#[derive(Debug, Clone)]
pub struct ArenaState {
    pub kind: ArenaKind,
    pub seed: u64,
    pub rng: Pcg32,
    pub arena: Arena,
    /// Interior wall segments
    pub walls: Vec<Aabb>,
    /// Crates and other blocking props
    pub boxes: Vec<Aabb>,
    pub chests: Vec<Chest>,
    pub pickups: Vec<Pickup>,
    pub player: Player,
    pub npcs: NpcPool,
    pub projectiles: ProjectilePool,
    pub blocks: BlockPool,
    pub pursuit: PursuitTracker,
    /// Trigger zone leading to the drill room (dungeon only)
    pub drill_pad: Option<Aabb>,
    /// Currency picked up during this run, indexed by `Currency::index`
    pub collected: [u32; Currency::COUNT],
    pub time_ticks: u64,
    /// Player step result from the last tick
    pub last_step: Option<StepOutcome>,
    pub events: Vec<GameEvent>,
    pub outcome: ArenaOutcome,
}

impl ArenaState {
    fn empty(kind: ArenaKind, seed: u64, arena: Arena, spawn: Vec3) -> Self {
        Self {
            kind,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            arena,
            walls: Vec::new(),
            boxes: Vec::new(),
            chests: Vec::new(),
            pickups: Vec::new(),
            player: Player::new(spawn),
            npcs: npc_pool(),
            projectiles: projectile_pool(),
            blocks: block_pool(),
            pursuit: PursuitTracker::default(),
            drill_pad: None,
            collected: [0; Currency::COUNT],
            time_ticks: 0,
            last_step: None,
            events: Vec::new(),
            outcome: ArenaOutcome::Continue,
        }
    }

    /// The walled dungeon floor with chests, pickups and hostile NPCs
    pub fn dungeon(seed: u64) -> Self {
        let mut state = Self::empty(ArenaKind::Dungeon, seed, Arena::default(), PLAYER_SPAWN);

        let wall_y = FLOOR_TOP + WALL_HEIGHT / 2.0;
        state.walls = vec![
            wall_segment(Vec3::new(-5.0, wall_y, -4.0), 6.0, true),
            wall_segment(Vec3::new(5.0, wall_y, 4.0), 6.0, true),
            wall_segment(Vec3::new(0.0, wall_y, -10.0), 4.0, false),
        ];

        let crate_y = FLOOR_TOP + 0.75;
        state.boxes = [(-10.0, 8.0), (10.0, -6.0), (-3.0, 2.0), (7.0, 10.0)]
            .into_iter()
            .map(|(x, z)| Aabb::from_center_size(Vec3::new(x, crate_y, z), Vec3::splat(1.5)))
            .collect();

        let chest_size = Vec3::new(1.2, 1.0, 0.8);
        state.chests = [(-13.0, -13.0), (13.0, 13.0), (-13.0, 13.0)]
            .into_iter()
            .map(|(x, z)| Chest {
                position: Vec3::new(x, FLOOR_TOP + chest_size.y / 2.0, z),
                size: chest_size,
                state: ChestState::Full,
                currency: Currency::Gold,
                amount: CHEST_PAYOUT,
            })
            .collect();

        state.drill_pad = Some(Aabb::from_center_size(
            Vec3::new(12.0, FLOOR_TOP + 0.05, -12.0),
            Vec3::new(2.0, 0.1, 2.0),
        ));

        for i in 0..DUNGEON_PICKUPS {
            let currency = if i % 3 == 0 { Currency::Silver } else { Currency::Gold };
            if let Some(pos) = state.random_free_spot(PICKUP_RADIUS * 2.0, 2.0) {
                state.pickups.push(Pickup {
                    position: Vec3::new(pos.x, FLOOR_TOP + 0.5, pos.z),
                    currency,
                    amount: 1,
                    active: true,
                });
            }
        }

        for i in 0..DUNGEON_NPCS {
            let kind = match i % 3 {
                0 => NpcKind::Slime,
                1 => NpcKind::Bat,
                _ => NpcKind::Golem,
            };
            if let Some(pos) = state.random_free_spot(NPC_SIZE.x, 6.0) {
                emit_npc(&mut state.npcs, kind, pos.x, pos.z);
            }
        }

        log::info!(
            "Dungeon built (seed {}): {} pickups, {} npcs",
            seed,
            state.pickups.len(),
            state.npcs.active_count()
        );
        state
    }

    /// The drill room: a small range with a wave of target blocks
    pub fn drill(seed: u64) -> Self {
        let arena = Arena::new(8.0, 8.0, ARENA_CEILING);
        let mut state = Self::empty(ArenaKind::Drill, seed, arena, DRILL_SPAWN);
        state.spawn_drill_wave();
        state
    }

    /// Emit a fresh row of drill blocks (recycles ring slots)
    pub fn spawn_drill_wave(&mut self) {
        let y = FLOOR_TOP + DRILL_BLOCK_SIZE.y / 2.0;
        for i in 0..DRILL_WAVE_SIZE {
            let x = -7.0 + i as f32 * 2.0;
            emit_block(&mut self.blocks, Vec3::new(x, y, -5.0));
        }
    }

    /// Every blocking static box this frame: walls, crates, chests, live blocks
    pub fn static_colliders(&self) -> Vec<Aabb> {
        let mut out = Vec::with_capacity(
            self.walls.len() + self.boxes.len() + self.chests.len() + self.blocks.capacity(),
        );
        out.extend_from_slice(&self.walls);
        out.extend_from_slice(&self.boxes);
        out.extend(self.chests.iter().map(Chest::aabb));
        out.extend(self.blocks.active_slots().map(|i| self.blocks.slots.aabb(i)));
        out
    }

    /// Map a `static_colliders` index back to a chest
    pub fn chest_index(&self, static_index: usize) -> Option<usize> {
        let first = self.walls.len() + self.boxes.len();
        (static_index >= first && static_index < first + self.chests.len())
            .then(|| static_index - first)
    }

    pub fn collect(&mut self, currency: Currency, amount: u32) {
        self.collected[currency.index()] += amount;
    }

    pub fn total_collected(&self) -> u32 {
        self.collected.iter().sum()
    }

    /// Everything worth collecting has been collected
    pub fn is_cleared(&self) -> bool {
        self.kind == ArenaKind::Dungeon
            && self.chests.iter().all(|c| c.state == ChestState::Empty)
            && self.pickups.iter().all(|p| !p.active)
    }

    /// Normalized distance from the player to the nearest hostile NPC (1.0 if none in sight)
    pub fn threat_factor(&self) -> f32 {
        let player = self.player.body.position;
        self.npcs
            .active_slots()
            .filter(|&i| self.npcs.slots.flags[i].contains(NpcFlags::HOSTILE))
            .map(|i| crate::ratio(crate::distance(self.npcs.slots.position[i], player), NPC_SIGHT_RADIUS))
            .fold(1.0f32, f32::min)
    }

    /// A random floor spot whose footprint clears all statics and the player spawn
    fn random_free_spot(&mut self, footprint: f32, min_spawn_dist: f32) -> Option<Vec3> {
        let statics = self.static_colliders();
        let margin = footprint + 1.0;
        let hx = self.arena.bounds.max.x - margin;
        let hz = self.arena.bounds.max.z - margin;
        for _ in 0..32 {
            let x = self.rng.random_range(-hx..hx);
            let z = self.rng.random_range(-hz..hz);
            let candidate = Aabb::from_center_size(
                Vec3::new(x, FLOOR_TOP + 1.0, z),
                Vec3::new(footprint + 0.5, 2.0, footprint + 0.5),
            );
            let clear = !statics.iter().any(|s| s.intersects(&candidate))
                && self.drill_pad.is_none_or(|pad| !pad.intersects(&candidate))
                && !self
                    .npcs
                    .active_slots()
                    .any(|n| candidate.intersects_sphere(self.npcs.slots.position[n], NPC_RADIUS));
            let far = crate::distance(Vec3::new(x, 0.0, z), Vec3::new(PLAYER_SPAWN.x, 0.0, PLAYER_SPAWN.z))
                >= min_spawn_dist;
            if clear && far {
                return Some(Vec3::new(x, 0.0, z));
            }
        }
        log::warn!("No free spot found after 32 tries (seed {})", self.seed);
        None
    }
}

/// A wall segment running along X (`along_x`) or Z
fn wall_segment(center: Vec3, length: f32, along_x: bool) -> Aabb {
    let size = if along_x {
        Vec3::new(length, WALL_HEIGHT, WALL_THICKNESS)
    } else {
        Vec3::new(WALL_THICKNESS, WALL_HEIGHT, length)
    };
    Aabb::from_center_size(center, size)
}
