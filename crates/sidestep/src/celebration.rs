//! Dialog choreography after the affirmative answer.
//!
//! ```text
//! Idle --affirm--> PrimaryOpen --dismiss--> SecondaryOpen --timeout | dismiss--> Idle
//! ```
//!
//! Visibility of both dialogs derives from the single [`Stage`], so they can
//! never be shown together.

use crate::timer::{Timer, TimerRequest};
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;
use crate::validate::{self, ParamError};
use strum::Display;

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CelebrationParams {
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "auto_close_ms")]
    pub auto_close: Duration,
}

impl Default for CelebrationParams {
    fn default() -> Self {
        Self {
            auto_close: Duration::from_millis(5000),
        }
    }
}

impl CelebrationParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        validate::duration("auto_close_ms", self.auto_close)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum Stage {
    #[default]
    Idle,
    PrimaryOpen,
    SecondaryOpen,
}

/// What a click inside a dialog landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ClickTarget {
    /// The dialog's outermost container.
    Root,
    Backdrop,
    /// Anything inside the dialog card.
    Content,
    CloseButton,
}

impl ClickTarget {
    pub fn dismisses(&self) -> bool {
        !matches!(self, Self::Content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Make the dialogs reflect `Stage`.
    Show(Stage),
    Confetti,
    Timer(TimerRequest),
}

#[derive(Debug, Default)]
pub struct CelebrationSequencer {
    params: CelebrationParams,
    stage: Stage,
}

impl CelebrationSequencer {
    pub fn new(params: CelebrationParams) -> Self {
        Self {
            params,
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn set_params(&mut self, params: CelebrationParams) {
        self.params = params;
    }

    pub fn affirm(&mut self) -> Vec<Effect> {
        if self.stage != Stage::Idle {
            log::trace!("affirm ignored in {}", self.stage);
            return Vec::new();
        }
        self.enter(Stage::PrimaryOpen);
        vec![Effect::Show(Stage::PrimaryOpen), Effect::Confetti]
    }

    /// Handles a click on whichever dialog is open.
    pub fn dismiss(&mut self, target: ClickTarget) -> Vec<Effect> {
        if !target.dismisses() {
            return Vec::new();
        }
        match self.stage {
            Stage::Idle => Vec::new(),
            Stage::PrimaryOpen => {
                self.enter(Stage::SecondaryOpen);
                vec![
                    Effect::Show(Stage::SecondaryOpen),
                    Effect::Timer(TimerRequest::Arm(
                        Timer::SecondaryAutoClose,
                        self.params.auto_close,
                    )),
                ]
            }
            // the secondary dialog has no close button
            Stage::SecondaryOpen if target == ClickTarget::CloseButton => Vec::new(),
            Stage::SecondaryOpen => {
                self.enter(Stage::Idle);
                vec![
                    Effect::Timer(TimerRequest::Disarm(Timer::SecondaryAutoClose)),
                    Effect::Show(Stage::Idle),
                ]
            }
        }
    }

    pub fn auto_close_elapsed(&mut self) -> Vec<Effect> {
        if self.stage != Stage::SecondaryOpen {
            return Vec::new();
        }
        self.enter(Stage::Idle);
        vec![Effect::Show(Stage::Idle)]
    }

    pub fn fire(&mut self, timer: Timer) -> Vec<Effect> {
        match timer {
            Timer::SecondaryAutoClose => self.auto_close_elapsed(),
            Timer::Settle | Timer::ResizeDebounce => Vec::new(),
        }
    }

    fn enter(&mut self, stage: Stage) {
        log::debug!("celebration {} -> {}", self.stage, stage);
        self.stage = stage;
    }
}
