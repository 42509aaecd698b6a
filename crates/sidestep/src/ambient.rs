//! Slow background motes that rise through the window on a loop.

use crate::geometry::{Point, Viewport};
use crate::validate::{self, ParamError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;

const FADE_FRACTION: f64 = 0.1;
pub const MOTE_RADIUS: f64 = 3.0;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AmbientParams {
    pub count: usize,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "max_delay_ms")]
    pub max_delay: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "min_period_ms")]
    pub min_period: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "max_period_ms")]
    pub max_period: Duration,
}

impl Default for AmbientParams {
    fn default() -> Self {
        Self {
            count: 30,
            max_delay: Duration::from_secs(15),
            min_period: Duration::from_secs(10),
            max_period: Duration::from_secs(20),
        }
    }
}

impl AmbientParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        validate::count("count", self.count)?;
        validate::duration("max_delay_ms", self.max_delay)?;
        validate::duration("min_period_ms", self.min_period)?;
        validate::duration("max_period_ms", self.max_period)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mote {
    /// Horizontal position as a fraction of the viewport width.
    pub column: f64,
    pub delay: Duration,
    pub period: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoteFrame {
    pub center: Point,
    pub opacity: f64,
}

impl Mote {
    pub fn random<R: Rng + ?Sized>(params: &AmbientParams, rng: &mut R) -> Self {
        let delay_ms = params.max_delay.as_millis() as u64;
        let lo = params.min_period.as_millis() as u64;
        let hi = params.max_period.as_millis() as u64;
        Self {
            column: rng.random_range(0.0..1.0),
            delay: Duration::from_millis(rng.random_range(0..=delay_ms)),
            // zero-length periods would never advance
            period: Duration::from_millis(rng.random_range(lo.min(hi)..=lo.max(hi)).max(1)),
        }
    }

    /// Frame at `elapsed` since the field was created; `None` while delayed.
    pub fn frame_at(&self, elapsed: Duration, viewport: Viewport) -> Option<MoteFrame> {
        let running = elapsed.checked_sub(self.delay)?;
        let phase = (running.as_secs_f64() % self.period.as_secs_f64()) / self.period.as_secs_f64();

        let opacity = if phase < FADE_FRACTION {
            phase / FADE_FRACTION
        } else if phase > 1.0 - FADE_FRACTION {
            (1.0 - phase) / FADE_FRACTION
        } else {
            1.0
        };

        let travel = viewport.height + 2.0 * MOTE_RADIUS;
        Some(MoteFrame {
            center: Point::new(
                self.column * viewport.width,
                viewport.height + MOTE_RADIUS - phase * travel,
            ),
            opacity,
        })
    }
}

#[derive(Debug, Default)]
pub struct AmbientField {
    motes: Vec<Mote>,
}

impl AmbientField {
    pub fn new<R: Rng + ?Sized>(params: &AmbientParams, rng: &mut R) -> Self {
        Self {
            motes: (0..params.count).map(|_| Mote::random(params, rng)).collect(),
        }
    }

    pub fn motes(&self) -> &[Mote] {
        &self.motes
    }

    pub fn frames(
        &self,
        elapsed: Duration,
        viewport: Viewport,
    ) -> impl Iterator<Item = MoteFrame> + '_ {
        self.motes
            .iter()
            .filter_map(move |m| m.frame_at(elapsed, viewport))
    }
}
