//! State machine for the control that runs away from the pointer.

use crate::geometry::{Point, Rect, Viewport};
use crate::placement::{self, Outcome, PlacementParams};
use crate::timer::{Timer, TimerRequest};
use crate::validate::{self, ParamError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EvasionParams {
    pub margin: f64,
    pub min_distance: f64,
    pub buffer: f64,
    pub max_attempts: u32,
    /// Largest transient rotation in degrees, either direction.
    pub max_tilt: f64,
    pub tilt_scale: f64,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "settle_ms")]
    pub settle: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "resize_debounce_ms")]
    pub resize_debounce: Duration,
}

impl Default for EvasionParams {
    fn default() -> Self {
        let placement = PlacementParams::default();
        Self {
            margin: placement.margin,
            min_distance: placement.min_distance,
            buffer: placement.buffer,
            max_attempts: placement.max_attempts,
            max_tilt: 15.0,
            tilt_scale: 0.92,
            settle: Duration::from_millis(250),
            resize_debounce: Duration::from_millis(250),
        }
    }
}

impl EvasionParams {
    pub fn placement(&self) -> PlacementParams {
        PlacementParams {
            margin: self.margin,
            min_distance: self.min_distance,
            buffer: self.buffer,
            max_attempts: self.max_attempts,
        }
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        self.placement().validate()?;
        validate::finite("max_tilt", self.max_tilt)?;
        validate::non_negative("tilt_scale", self.tilt_scale)?;
        validate::duration("settle_ms", self.settle)?;
        validate::duration("resize_debounce_ms", self.resize_debounce)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tilt {
    pub degrees: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Move to `position` in window coordinates with a transient tilt.
    /// `detach` is set when the control is still in its layout slot.
    Place {
        position: Point,
        tilt: Tilt,
        detach: bool,
    },
    /// Clear the tilt.
    Straighten,
    /// Return to the layout slot with no offset or transform.
    Dock,
    Timer(TimerRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Phase {
    #[default]
    Docked,
    /// Moving; further relocations are ignored until the settle timer fires.
    Settling { position: Point },
    Displaced { position: Point },
}

#[derive(Debug, Default)]
pub struct EvasionController {
    params: EvasionParams,
    phase: Phase,
    resize_pending: bool,
}

impl EvasionController {
    pub fn new(params: EvasionParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Takes effect from the next relocation; the current phase is kept.
    pub fn set_params(&mut self, params: EvasionParams) {
        self.params = params;
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.phase, Phase::Settling { .. })
    }

    /// Picks a new spot for `control` away from `obstacle`. Geometry is taken
    /// as given by the caller at the moment of the event.
    pub fn relocate<R: Rng + ?Sized>(
        &mut self,
        viewport: Viewport,
        obstacle: Rect,
        control: Rect,
        rng: &mut R,
    ) -> Vec<Effect> {
        if self.is_moving() {
            log::trace!("relocation already in flight, ignoring");
            return Vec::new();
        }
        if viewport.is_empty() || obstacle.is_empty() || control.is_empty() {
            log::debug!(
                "skipping relocation, layout not ready (viewport {viewport:?}, obstacle {obstacle:?}, control {control:?})"
            );
            return Vec::new();
        }

        let placement = placement::find_placement(
            viewport,
            &obstacle,
            control.size(),
            &self.params.placement(),
            rng,
        );
        match placement.outcome {
            Outcome::Accepted { attempts } => log::debug!(
                "relocating to ({:.1}, {:.1}) after {} attempts",
                placement.position.x,
                placement.position.y,
                attempts
            ),
            Outcome::Fallback(corner) => {
                log::debug!("no clear spot found, falling back to {corner}")
            }
        }

        let max_tilt = self.params.max_tilt.abs();
        let tilt = Tilt {
            degrees: rng.random_range(-max_tilt..=max_tilt),
            scale: self.params.tilt_scale,
        };
        let detach = self.phase == Phase::Docked;
        self.phase = Phase::Settling {
            position: placement.position,
        };

        vec![
            Effect::Place {
                position: placement.position,
                tilt,
                detach,
            },
            Effect::Timer(TimerRequest::Arm(Timer::Settle, self.params.settle)),
        ]
    }

    pub fn settle_elapsed(&mut self) -> Vec<Effect> {
        match self.phase {
            Phase::Settling { position } => {
                self.phase = Phase::Displaced { position };
                vec![Effect::Straighten]
            }
            _ => Vec::new(),
        }
    }

    /// Restarts the debounce on every resize event.
    pub fn on_resize(&mut self) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(2);
        if self.resize_pending {
            effects.push(Effect::Timer(TimerRequest::Disarm(Timer::ResizeDebounce)));
        }
        self.resize_pending = true;
        effects.push(Effect::Timer(TimerRequest::Arm(
            Timer::ResizeDebounce,
            self.params.resize_debounce,
        )));
        effects
    }

    pub fn resize_elapsed(&mut self) -> Vec<Effect> {
        self.resize_pending = false;
        let effects = match self.phase {
            Phase::Docked => return Vec::new(),
            Phase::Settling { .. } => vec![
                Effect::Timer(TimerRequest::Disarm(Timer::Settle)),
                Effect::Dock,
            ],
            Phase::Displaced { .. } => vec![Effect::Dock],
        };
        log::debug!("viewport resized, docking");
        self.phase = Phase::Docked;
        effects
    }

    /// Dispatches an expired timer; timers owned by other components are ignored.
    pub fn fire(&mut self, timer: Timer) -> Vec<Effect> {
        match timer {
            Timer::Settle => self.settle_elapsed(),
            Timer::ResizeDebounce => self.resize_elapsed(),
            Timer::SecondaryAutoClose => Vec::new(),
        }
    }
}
