//! Backend-agnostic render data
//!
//! Screens describe a frame as a flat list of `DrawItem`s plus an optional
//! 3D camera. A rendering backend consumes the `RenderFrame`; nothing here
//! touches a GPU.

use glam::Vec3;
use serde::Serialize;

use crate::consts::CAMERA_OFFSET;
use crate::sim::entity::{BlockMaterial, ChestState};
use crate::sim::{ArenaState, NpcFlags};

/// RGBA, each channel 0..1
pub type Color = [f32; 4];

pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = [0.05, 0.05, 0.08, 1.0];
    pub const LOGO_BACKGROUND: Color = [1.0, 1.0, 1.0, 1.0];
    pub const FLOOR: Color = [0.25, 0.22, 0.2, 1.0];
    pub const WALL: Color = [0.45, 0.42, 0.4, 1.0];
    pub const PROP: Color = [0.55, 0.35, 0.2, 1.0];
    pub const CHEST_FULL: Color = [0.95, 0.75, 0.1, 1.0];
    pub const CHEST_EMPTY: Color = [0.4, 0.3, 0.1, 1.0];
    pub const GOLD: Color = [1.0, 0.85, 0.0, 1.0];
    pub const SILVER: Color = [0.8, 0.8, 0.85, 1.0];
    pub const CRYSTAL: Color = [0.4, 0.9, 1.0, 1.0];
    pub const PLAYER: Color = [0.2, 0.5, 1.0, 1.0];
    pub const PLAYER_DANGER: Color = [1.0, 0.3, 0.2, 1.0];
    pub const NPC: Color = [0.6, 0.9, 0.3, 1.0];
    pub const NPC_CHASING: Color = [0.9, 0.4, 0.2, 1.0];
    pub const PROJECTILE: Color = [1.0, 1.0, 0.6, 1.0];
    pub const BLOCK_INTACT: Color = [0.5, 0.5, 0.6, 1.0];
    pub const BLOCK_CRACKED: Color = [0.35, 0.3, 0.35, 1.0];
    pub const DRILL_PAD: Color = [0.3, 0.9, 0.9, 0.6];
    pub const TEXT: Color = [0.9, 0.9, 0.9, 1.0];
    pub const TEXT_DIM: Color = [0.5, 0.5, 0.5, 1.0];
    pub const HIGHLIGHT: Color = [1.0, 0.8, 0.2, 1.0];
    pub const OVERLAY: Color = [0.0, 0.0, 0.0, 1.0];
}

/// Perspective camera looking at a target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
}

impl Camera {
    /// Third-person camera behind and above `target`
    pub fn following(target: Vec3) -> Self {
        Self {
            position: target + CAMERA_OFFSET,
            target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shape {
    Cube,
    Sphere,
    Plane,
    /// Screen-space rectangle (UI); position x/y in 0..1
    Rect,
}

/// What a draw item represents, for backends that style by role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DrawTag {
    Floor,
    Wall,
    Prop,
    Chest,
    Pickup,
    Player,
    Npc,
    Projectile,
    Block,
    DrillPad,
    /// UI text; the string is the label
    Text(String),
    /// UI bar or panel
    Panel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawItem {
    pub shape: Shape,
    pub position: Vec3,
    pub size: Vec3,
    pub color: Color,
    pub tag: DrawTag,
}

impl DrawItem {
    pub fn cube(position: Vec3, size: Vec3, color: Color, tag: DrawTag) -> Self {
        Self {
            shape: Shape::Cube,
            position,
            size,
            color,
            tag,
        }
    }

    pub fn sphere(center: Vec3, radius: f32, color: Color, tag: DrawTag) -> Self {
        Self {
            shape: Shape::Sphere,
            position: center,
            size: Vec3::splat(radius * 2.0),
            color,
            tag,
        }
    }

    /// Screen-space text at normalized `(x, y)`
    pub fn text(label: impl Into<String>, x: f32, y: f32, scale: f32, color: Color) -> Self {
        Self {
            shape: Shape::Rect,
            position: Vec3::new(x, y, 0.0),
            size: Vec3::new(scale, scale, 0.0),
            color,
            tag: DrawTag::Text(label.into()),
        }
    }

    /// Screen-space filled rectangle
    pub fn panel(x: f32, y: f32, w: f32, h: f32, color: Color) -> Self {
        Self {
            shape: Shape::Rect,
            position: Vec3::new(x, y, 0.0),
            size: Vec3::new(w, h, 0.0),
            color,
            tag: DrawTag::Panel,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match &self.tag {
            DrawTag::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Everything a backend needs to present one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub clear: Color,
    /// 3D camera; `None` for pure UI screens
    pub camera: Option<Camera>,
    pub items: Vec<DrawItem>,
    /// Opacity of the full-screen transition overlay
    pub overlay_alpha: f32,
}

impl Default for RenderFrame {
    fn default() -> Self {
        Self {
            clear: palette::BACKGROUND,
            camera: None,
            items: Vec::new(),
            overlay_alpha: 0.0,
        }
    }
}

impl RenderFrame {
    pub fn push(&mut self, item: DrawItem) {
        self.items.push(item);
    }

    pub fn text(&mut self, label: impl Into<String>, x: f32, y: f32, scale: f32, color: Color) {
        self.items.push(DrawItem::text(label, x, y, scale, color));
    }

    /// All text labels in draw order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(DrawItem::label)
    }
}

fn currency_color(currency: crate::sim::Currency) -> Color {
    match currency {
        crate::sim::Currency::Gold => palette::GOLD,
        crate::sim::Currency::Silver => palette::SILVER,
        crate::sim::Currency::Crystal => palette::CRYSTAL,
    }
}

/// Push the 3D scene for an arena
pub fn draw_arena(state: &ArenaState, frame: &mut RenderFrame) {
    let floor = state.arena.floor;
    frame.push(DrawItem {
        shape: Shape::Plane,
        position: Vec3::new(floor.center().x, floor.max.y, floor.center().z),
        size: floor.size(),
        color: palette::FLOOR,
        tag: DrawTag::Floor,
    });

    for wall in &state.walls {
        frame.push(DrawItem::cube(wall.center(), wall.size(), palette::WALL, DrawTag::Wall));
    }
    for prop in &state.boxes {
        frame.push(DrawItem::cube(prop.center(), prop.size(), palette::PROP, DrawTag::Prop));
    }
    for chest in &state.chests {
        let color = match chest.state {
            ChestState::Full => palette::CHEST_FULL,
            ChestState::Empty => palette::CHEST_EMPTY,
        };
        frame.push(DrawItem::cube(chest.position, chest.size, color, DrawTag::Chest));
    }
    if let Some(pad) = state.drill_pad {
        frame.push(DrawItem::cube(pad.center(), pad.size(), palette::DRILL_PAD, DrawTag::DrillPad));
    }
    for pickup in state.pickups.iter().filter(|p| p.active) {
        frame.push(DrawItem::sphere(
            pickup.position,
            crate::consts::PICKUP_RADIUS,
            currency_color(pickup.currency),
            DrawTag::Pickup,
        ));
    }

    let blocks = &state.blocks.slots;
    for i in state.blocks.active_slots() {
        let color = match blocks.material[i] {
            BlockMaterial::Intact => palette::BLOCK_INTACT,
            _ => palette::BLOCK_CRACKED,
        };
        frame.push(DrawItem::cube(blocks.position[i], blocks.size[i], color, DrawTag::Block));
    }

    let npcs = &state.npcs.slots;
    for i in state.npcs.active_slots() {
        let color = if npcs.flags[i].contains(NpcFlags::CHASING) {
            palette::NPC_CHASING
        } else {
            palette::NPC
        };
        frame.push(DrawItem::sphere(npcs.position[i], crate::consts::NPC_RADIUS, color, DrawTag::Npc));
    }

    let shots = &state.projectiles.slots;
    for i in state.projectiles.active_slots() {
        frame.push(DrawItem::sphere(
            shots.position[i],
            crate::consts::PROJECTILE_RADIUS,
            palette::PROJECTILE,
            DrawTag::Projectile,
        ));
    }

    let player_color = if state.pursuit.is_active() {
        palette::PLAYER_DANGER
    } else {
        palette::PLAYER
    };
    frame.push(DrawItem::cube(
        state.player.body.position,
        state.player.body.size,
        player_color,
        DrawTag::Player,
    ));
}

/// Health bar and currency counters
pub fn draw_hud(state: &ArenaState, frame: &mut RenderFrame) {
    frame.push(DrawItem::panel(0.02, 0.02, 0.3, 0.03, palette::TEXT_DIM));
    frame.push(DrawItem::panel(
        0.02,
        0.02,
        0.3 * state.player.health,
        0.03,
        palette::PLAYER_DANGER,
    ));
    for (row, currency) in crate::sim::Currency::ALL.into_iter().enumerate() {
        frame.text(
            format!("{}: {}", currency.as_str(), state.collected[currency.index()]),
            0.02,
            0.08 + row as f32 * 0.04,
            1.0,
            currency_color(currency),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_follows_target() {
        let cam = Camera::following(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cam.target, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cam.position - cam.target, CAMERA_OFFSET);
    }

    #[test]
    fn test_arena_scene_has_one_player() {
        let state = ArenaState::dungeon(11);
        let mut frame = RenderFrame::default();
        draw_arena(&state, &mut frame);
        let players = frame.items.iter().filter(|i| i.tag == DrawTag::Player).count();
        assert_eq!(players, 1);
        let npcs = frame.items.iter().filter(|i| i.tag == DrawTag::Npc).count();
        assert_eq!(npcs, state.npcs.active_count());
    }

    #[test]
    fn test_labels_only_lists_text() {
        let mut frame = RenderFrame::default();
        frame.push(DrawItem::panel(0.0, 0.0, 1.0, 1.0, palette::OVERLAY));
        frame.text("PLAY", 0.5, 0.5, 2.0, palette::TEXT);
        assert_eq!(frame.labels().collect::<Vec<_>>(), vec!["PLAY"]);
    }
}
