//! Per-frame arena tick
//!
//! Order within a frame:
//! 1. player: jump, kinematics, collision resolution, contacts, pickups, firing
//! 2. projectiles: flight, wall/block/NPC hits
//! 3. NPCs: chase or wander, kinematics, collision resolution
//! 4. outcome evaluation

use glam::Vec3;
use rand::Rng;

use super::collision::{Collider, CollisionWorld, ResolveMode, step_body};
use super::entity::*;
use super::kinematics::{Body, KinematicParams};
use super::state::{ArenaKind, ArenaOutcome, ArenaState, DRILL_BLOCK_PAYOUT, GameEvent};
use crate::consts::*;
use crate::safe_normalize;

/// Frames an NPC keeps a wander heading
const WANDER_FRAMES: u32 = 90;

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Desired horizontal movement; only x and z are used
    pub movement: Vec3,
    pub jump: bool,
    pub fire: bool,
    /// Menu accept
    pub confirm: bool,
    /// Menu cancel / leave the current screen
    pub back: bool,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Advance the arena by one frame
pub fn tick(state: &mut ArenaState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.time_ticks += 1;
    state.player.tick_cooldowns();
    for i in 0..state.npcs.capacity() {
        state.npcs.slots.flags[i].set(NpcFlags::CONTACT, false);
    }

    step_player(state, input, dt);
    step_projectiles(state, dt);
    step_npcs(state, dt);

    if state.kind == ArenaKind::Drill && state.blocks.active_count() == 0 {
        state.spawn_drill_wave();
        state.events.push(GameEvent::WaveRespawned);
    }

    state.outcome = evaluate(state);
}

fn step_player(state: &mut ArenaState, input: &TickInput, dt: f32) {
    let params = KinematicParams::PLAYER;
    let intent = Vec3::new(input.movement.x, 0.0, input.movement.z);
    if intent != Vec3::ZERO {
        state.player.facing = safe_normalize(intent);
    }
    if input.jump && state.player.body.jump(&params) {
        state.events.push(GameEvent::Jumped);
    }

    let statics = state.static_colliders();
    let npc_slots: Vec<usize> = state.npcs.active_slots().collect();
    let dynamics: Vec<Collider> = npc_slots
        .iter()
        .map(|&i| Collider::Sphere {
            center: state.npcs.slots.position[i],
            radius: NPC_RADIUS,
        })
        .collect();
    let world = CollisionWorld {
        arena: &state.arena,
        statics: &statics,
        dynamics: &dynamics,
    };

    let was_reverted = state.last_step.is_some_and(|s| s.reverted);
    let mode = state.pursuit.resolve_mode();
    let outcome = step_body(
        &mut state.player.body,
        intent,
        &params,
        params.magnitude(dt),
        &world,
        mode,
    );
    state.last_step = Some(outcome);

    if outcome.reverted && !was_reverted {
        state.events.push(GameEvent::Bumped);
    }

    if let Some(k) = outcome.contact.dynamic_hit {
        let slot = npc_slots[k];
        state.npcs.slots.flags[slot].set(NpcFlags::CONTACT, true);
        if state.player.apply_damage(NPC_CONTACT_DAMAGE) {
            state.events.push(GameEvent::PlayerHit);
        }
    }

    if let Some(ci) = outcome.contact.static_hit.and_then(|i| state.chest_index(i)) {
        if let Some((currency, amount)) = state.chests[ci].open() {
            state.collect(currency, amount);
            state.events.push(GameEvent::ChestOpened { currency, amount });
            log::info!("Chest {} opened: {} {}", ci, amount, currency.as_str());
        }
    }

    let was_active = state.pursuit.is_active();
    let factor = state.threat_factor();
    state.pursuit.update(outcome.reverted, factor);
    if !was_active && state.pursuit.is_active() {
        state.events.push(GameEvent::DangerStarted);
    }

    let player_box = state.player.aabb();
    for pickup in state.pickups.iter_mut().filter(|p| p.active) {
        if player_box.intersects_sphere(pickup.position, PICKUP_RADIUS) {
            pickup.active = false;
            state.collected[pickup.currency.index()] += pickup.amount;
            state.events.push(GameEvent::PickedUp {
                currency: pickup.currency,
                amount: pickup.amount,
            });
        }
    }

    if input.fire && state.player.fire_cooldown == 0 {
        let facing = state.player.facing;
        let offset = PLAYER_SIZE.x / 2.0 + PROJECTILE_RADIUS + 0.05;
        let origin = state.player.body.position + facing * offset;
        emit_projectile(&mut state.projectiles, origin, facing);
        state.player.fire_cooldown = FIRE_COOLDOWN;
        state.events.push(GameEvent::Fired);
    }
}

fn step_projectiles(state: &mut ArenaState, dt: f32) {
    let params = KinematicParams::PROJECTILE;
    let magnitude = params.magnitude(dt);
    let size = Vec3::splat(PROJECTILE_RADIUS * 2.0);

    let mut solid = Vec::with_capacity(state.walls.len() + state.boxes.len() + state.chests.len());
    solid.extend_from_slice(&state.walls);
    solid.extend_from_slice(&state.boxes);
    solid.extend(state.chests.iter().map(Chest::aabb));

    let live: Vec<usize> = state.projectiles.active_slots().collect();
    for i in live {
        let shots = &mut state.projectiles.slots;
        shots.ttl[i] = shots.ttl[i].saturating_sub(1);
        if shots.ttl[i] == 0 {
            shots.active[i] = false;
            continue;
        }

        let mut body = Body::new(shots.position[i], size);
        body.integrate(shots.direction[i], &params, magnitude);
        shots.position[i] = body.position;
        let aabb = shots.aabb(i);

        if state.arena.boundary_flags(&aabb).out_of_bounds || solid.iter().any(|s| s.intersects(&aabb)) {
            shots.active[i] = false;
            continue;
        }

        let block_hit = state
            .blocks
            .active_slots()
            .find(|&b| state.blocks.slots.aabb(b).intersects(&aabb));
        if let Some(b) = block_hit {
            shots.active[i] = false;
            let before = state.blocks.slots.material[b];
            match state.blocks.slots.damage(b, PROJECTILE_DAMAGE) {
                BlockMaterial::Broken => {
                    state.collected[Currency::Crystal.index()] += DRILL_BLOCK_PAYOUT;
                    state.events.push(GameEvent::BlockBroken);
                    state.events.push(GameEvent::PickedUp {
                        currency: Currency::Crystal,
                        amount: DRILL_BLOCK_PAYOUT,
                    });
                }
                BlockMaterial::Cracked if before != BlockMaterial::Cracked => {
                    state.events.push(GameEvent::BlockCracked);
                }
                _ => {}
            }
            continue;
        }

        let npc_hit = state
            .npcs
            .active_slots()
            .find(|&n| aabb.intersects_sphere(state.npcs.slots.position[n], NPC_RADIUS));
        if let Some(n) = npc_hit {
            shots.active[i] = false;
            if state.npcs.slots.damage(n, PROJECTILE_DAMAGE) {
                state.events.push(GameEvent::NpcDefeated);
            }
        }
    }
}

fn step_npcs(state: &mut ArenaState, dt: f32) {
    let params = KinematicParams::NPC;
    let statics = state.static_colliders();
    let player_box = state.player.aabb();
    let player_pos = state.player.body.position;

    let live: Vec<usize> = state.npcs.active_slots().collect();
    let mut dynamics = Vec::with_capacity(live.len());
    for &i in &live {
        // Player first: dynamic hit 0 is contact with the player
        dynamics.clear();
        dynamics.push(Collider::Box(player_box));
        dynamics.extend(live.iter().filter(|&&n| n != i).map(|&n| Collider::Sphere {
            center: state.npcs.slots.position[n],
            radius: NPC_RADIUS,
        }));
        let world = CollisionWorld {
            arena: &state.arena,
            statics: &statics,
            dynamics: &dynamics,
        };

        let npcs = &mut state.npcs.slots;
        let to_player = Vec3::new(
            player_pos.x - npcs.position[i].x,
            0.0,
            player_pos.z - npcs.position[i].z,
        );

        let intent = if npcs.action[i] == NpcAction::Stunned && npcs.timer[i] > 0 {
            npcs.timer[i] -= 1;
            Vec3::ZERO
        } else {
            npcs.flags[i].set(NpcFlags::STUNNED, false);
            if to_player.length() <= NPC_SIGHT_RADIUS {
                npcs.action[i] = NpcAction::Chase;
                npcs.flags[i].set(NpcFlags::CHASING, true);
                to_player
            } else {
                if npcs.action[i] != NpcAction::Wander || npcs.timer[i] == 0 {
                    let angle = state.rng.random_range(0.0..std::f32::consts::TAU);
                    npcs.heading[i] = Vec3::new(angle.cos(), 0.0, angle.sin());
                    npcs.timer[i] = WANDER_FRAMES;
                } else {
                    npcs.timer[i] -= 1;
                }
                npcs.action[i] = NpcAction::Wander;
                npcs.flags[i].set(NpcFlags::CHASING, false);
                npcs.heading[i]
            }
        };

        let mut body = npcs.body(i);
        let magnitude = params.magnitude(dt) * npcs.kind[i].speed_scale();
        let outcome = step_body(&mut body, intent, &params, magnitude, &world, ResolveMode::Revert);
        npcs.store_body(i, &body);

        if outcome.reverted && npcs.action[i] == NpcAction::Wander {
            npcs.timer[i] = 0;
        }
        if outcome.contact.dynamic_hit == Some(0) {
            npcs.flags[i].set(NpcFlags::CONTACT, true);
            if state.player.apply_damage(NPC_CONTACT_DAMAGE) {
                state.events.push(GameEvent::PlayerHit);
            }
        }
    }
}

fn evaluate(state: &ArenaState) -> ArenaOutcome {
    if state.player.is_dead() {
        ArenaOutcome::Defeated
    } else if state.is_cleared() {
        ArenaOutcome::Cleared
    } else if state
        .drill_pad
        .is_some_and(|pad| pad.intersects(&state.player.aabb()))
    {
        ArenaOutcome::EnterDrill
    } else {
        ArenaOutcome::Continue
    }
}
