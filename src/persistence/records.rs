//! Save slots and per-level records

use serde::{Deserialize, Serialize};

use super::RECORD_VERSION;

/// A player save slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSlot {
    pub version: String,
    pub id: u32,
    /// Highest level reached
    pub level: u32,
    pub gold: u32,
    pub health: f32,
    pub playtime_frames: u64,
}

impl SaveSlot {
    pub fn new(id: u32) -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            id,
            level: 1,
            gold: 0,
            health: 1.0,
            playtime_frames: 0,
        }
    }

    pub fn file_name(id: u32) -> String {
        format!("slot/{}.json", id)
    }

    /// Fold a finished run into the slot
    pub fn record_run(&mut self, gold: u32, health: f32, frames: u64) {
        self.gold = self.gold.saturating_add(gold);
        self.health = crate::sim::entity::clamp_health(health);
        self.playtime_frames = self.playtime_frames.saturating_add(frames);
    }
}

impl Default for SaveSlot {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Best result on one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub version: String,
    pub id: u32,
    pub cleared: bool,
    pub best_gold: u32,
}

impl LevelRecord {
    pub fn new(id: u32) -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            id,
            cleared: false,
            best_gold: 0,
        }
    }

    pub fn file_name(id: u32) -> String {
        format!("level_{}.json", id)
    }

    /// Merge a run result; returns true on a new best
    pub fn record_run(&mut self, cleared: bool, gold: u32) -> bool {
        self.cleared |= cleared;
        if gold > self.best_gold {
            self.best_gold = gold;
            true
        } else {
            false
        }
    }
}

impl Default for LevelRecord {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(SaveSlot::file_name(3), "slot/3.json");
        assert_eq!(LevelRecord::file_name(1), "level_1.json");
    }

    #[test]
    fn test_slot_record_run() {
        let mut slot = SaveSlot::new(1);
        slot.record_run(30, 0.4, 600);
        slot.record_run(5, 1.7, 60);
        assert_eq!(slot.gold, 35);
        assert_eq!(slot.health, 1.0);
        assert_eq!(slot.playtime_frames, 660);
    }

    #[test]
    fn test_level_best_only_improves() {
        let mut record = LevelRecord::new(1);
        assert!(record.record_run(false, 20));
        assert!(!record.record_run(true, 10));
        assert_eq!(record.best_gold, 20);
        assert!(record.cleared);
        record.record_run(false, 0);
        assert!(record.cleared);
    }
}
