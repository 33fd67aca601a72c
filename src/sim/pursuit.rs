//! Pursuit ("danger") escalation overlay
//!
//! Runs on top of the normal revert-all resolution. When an entity keeps
//! colliding while a trigger factor sits inside a narrow band for several
//! consecutive frames, the tracker goes Active and blocked steps ease back
//! toward the prior position instead of snapping.
//!
//! Idle -> Approaching -> Active -> Idle, with a wider exit band than entry
//! band so the state does not flicker at the band edges.

use serde::{Deserialize, Serialize};

use super::collision::ResolveMode;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PursuitConfig {
    pub band_low: f32,
    pub band_high: f32,
    /// Extra margin on both sides of the band before Active exits
    pub exit_margin: f32,
    pub frames_to_activate: u32,
    /// Heat ceiling; reaching it forces Active to end
    pub max_active_frames: u32,
    pub lerp: f32,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            band_low: PURSUIT_BAND_LOW,
            band_high: PURSUIT_BAND_HIGH,
            exit_margin: PURSUIT_EXIT_MARGIN,
            frames_to_activate: PURSUIT_FRAMES_TO_ACTIVATE,
            max_active_frames: PURSUIT_MAX_ACTIVE_FRAMES,
            lerp: PURSUIT_LERP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PursuitPhase {
    Idle,
    /// Consecutive qualifying frames seen so far
    Approaching { frames: u32 },
    Active,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PursuitTracker {
    pub config: PursuitConfig,
    pub phase: PursuitPhase,
    /// Counts up while Active, down otherwise; never below zero
    pub heat: u32,
}

impl Default for PursuitTracker {
    fn default() -> Self {
        Self::new(PursuitConfig::default())
    }
}

impl PursuitTracker {
    pub fn new(config: PursuitConfig) -> Self {
        Self {
            config,
            phase: PursuitPhase::Idle,
            heat: 0,
        }
    }

    fn in_entry_band(&self, factor: f32) -> bool {
        factor >= self.config.band_low && factor <= self.config.band_high
    }

    fn in_exit_band(&self, factor: f32) -> bool {
        factor >= self.config.band_low - self.config.exit_margin
            && factor <= self.config.band_high + self.config.exit_margin
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == PursuitPhase::Active
    }

    /// Resolution to use for the next step
    pub fn resolve_mode(&self) -> ResolveMode {
        if self.is_active() {
            ResolveMode::Ease(self.config.lerp)
        } else {
            ResolveMode::Revert
        }
    }

    /// Feed one frame's collision result and trigger factor
    pub fn update(&mut self, collided: bool, factor: f32) -> PursuitPhase {
        let qualifies = collided && self.in_entry_band(factor);

        let next = match self.phase {
            PursuitPhase::Idle if qualifies => self.approach(1),
            PursuitPhase::Idle => PursuitPhase::Idle,
            PursuitPhase::Approaching { frames } if qualifies => self.approach(frames + 1),
            PursuitPhase::Approaching { .. } => PursuitPhase::Idle,
            PursuitPhase::Active => {
                if self.heat + 1 >= self.config.max_active_frames || !self.in_exit_band(factor) {
                    PursuitPhase::Idle
                } else {
                    PursuitPhase::Active
                }
            }
        };

        if next != self.phase && (next == PursuitPhase::Active || self.phase == PursuitPhase::Active) {
            log::debug!("Pursuit {:?} -> {:?} (factor {:.2}, heat {})", self.phase, next, factor, self.heat);
        }
        self.phase = next;

        if self.is_active() {
            self.heat = (self.heat + 1).min(self.config.max_active_frames);
        } else {
            self.heat = self.heat.saturating_sub(1);
        }
        self.phase
    }

    fn approach(&self, frames: u32) -> PursuitPhase {
        if frames >= self.config.frames_to_activate {
            PursuitPhase::Active
        } else {
            PursuitPhase::Approaching { frames }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IN_BAND: f32 = 0.35;

    fn activate(tracker: &mut PursuitTracker) {
        for _ in 0..tracker.config.frames_to_activate {
            tracker.update(true, IN_BAND);
        }
    }

    #[test]
    fn test_activates_after_consecutive_frames() {
        let mut t = PursuitTracker::default();
        for i in 1..PURSUIT_FRAMES_TO_ACTIVATE {
            assert_eq!(t.update(true, IN_BAND), PursuitPhase::Approaching { frames: i });
        }
        assert_eq!(t.update(true, IN_BAND), PursuitPhase::Active);
        assert_eq!(t.resolve_mode(), ResolveMode::Ease(PURSUIT_LERP));
    }

    #[test]
    fn test_gap_resets_approach() {
        let mut t = PursuitTracker::default();
        t.update(true, IN_BAND);
        t.update(true, IN_BAND);
        assert_eq!(t.update(false, IN_BAND), PursuitPhase::Idle);
        assert_eq!(t.update(true, 0.9), PursuitPhase::Idle);
    }

    #[test]
    fn test_hysteresis_keeps_active_just_outside_entry_band() {
        let mut t = PursuitTracker::default();
        activate(&mut t);
        // Outside entry band but inside exit band
        assert_eq!(t.update(false, PURSUIT_BAND_HIGH + 0.05), PursuitPhase::Active);
        // Outside exit band
        assert_eq!(t.update(false, PURSUIT_BAND_HIGH + 0.2), PursuitPhase::Idle);
        assert_eq!(t.resolve_mode(), ResolveMode::Revert);
    }

    #[test]
    fn test_active_duration_is_bounded() {
        let mut t = PursuitTracker::default();
        activate(&mut t);
        let mut frames = 0;
        while t.is_active() {
            t.update(true, IN_BAND);
            frames += 1;
            assert!(frames <= PURSUIT_MAX_ACTIVE_FRAMES);
        }
        assert!(t.heat < PURSUIT_MAX_ACTIVE_FRAMES);
    }

    #[test]
    fn test_heat_cools_down_and_clamps() {
        let mut t = PursuitTracker::default();
        activate(&mut t);
        t.update(true, IN_BAND);
        let heat = t.heat;
        assert!(heat >= 2);
        t.update(false, 1.0);
        assert_eq!(t.heat, heat - 1);
        for _ in 0..500 {
            t.update(false, 1.0);
        }
        assert_eq!(t.heat, 0);
    }
}
