//! Two-phase screen fade
//!
//! A requested transition fades an overlay in to full opacity, swaps the
//! screens at the peak, then fades out more slowly. Screen updates are
//! suspended for the whole transition.

use super::ScreenId;
use crate::consts::{FADE_IN_STEP, FADE_OUT_STEP};

/// What a call to `Transition::step` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStep {
    /// No transition in progress
    Idle,
    FadingIn,
    /// Peak reached: unload `from`, init `to`
    Swap { from: ScreenId, to: ScreenId },
    FadingOut,
    /// Overlay gone, transition cleared
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    is_transitioning: bool,
    is_fading_out: bool,
    from: Option<ScreenId>,
    to: ScreenId,
    alpha: f32,
    fade_in_step: f32,
    fade_out_step: f32,
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(FADE_IN_STEP, FADE_OUT_STEP)
    }
}

impl Transition {
    pub fn new(fade_in_step: f32, fade_out_step: f32) -> Self {
        debug_assert!(fade_in_step > 0.0 && fade_out_step > 0.0);
        Self {
            is_transitioning: false,
            is_fading_out: false,
            from: None,
            to: ScreenId::Unknown,
            alpha: 0.0,
            fade_in_step,
            fade_out_step,
        }
    }

    /// Change fade speeds; applies from the next step
    pub fn set_steps(&mut self, fade_in_step: f32, fade_out_step: f32) {
        self.fade_in_step = fade_in_step;
        self.fade_out_step = fade_out_step;
    }

    /// Start a transition away from `current`; false if one is already running
    pub fn request(&mut self, to: ScreenId, current: ScreenId) -> bool {
        if self.is_transitioning {
            log::debug!("Transition to {:?} rejected: already heading to {:?}", to, self.to);
            return false;
        }
        if to == ScreenId::Unknown {
            log::debug!("Transition to Unknown rejected");
            return false;
        }
        self.is_transitioning = true;
        self.is_fading_out = false;
        self.from = Some(current);
        self.to = to;
        self.alpha = 0.0;
        true
    }

    /// Advance the fade by one frame
    pub fn step(&mut self) -> TransitionStep {
        if !self.is_transitioning {
            return TransitionStep::Idle;
        }

        if !self.is_fading_out {
            self.alpha += self.fade_in_step;
            if self.alpha >= 1.0 {
                self.alpha = 1.0;
                self.is_fading_out = true;
                return TransitionStep::Swap {
                    from: self.from.unwrap_or(ScreenId::Unknown),
                    to: self.to,
                };
            }
            return TransitionStep::FadingIn;
        }

        self.alpha -= self.fade_out_step;
        if self.alpha < 0.0 {
            self.is_transitioning = false;
            self.is_fading_out = false;
            self.from = None;
            self.to = ScreenId::Unknown;
            self.alpha = 0.0;
            return TransitionStep::Finished;
        }
        TransitionStep::FadingOut
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.is_transitioning
    }

    /// Overlay opacity, always within [0, 1]
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha.clamp(0.0, 1.0)
    }

    pub fn from(&self) -> Option<ScreenId> {
        self.from
    }

    pub fn to(&self) -> ScreenId {
        self.to
    }
}
