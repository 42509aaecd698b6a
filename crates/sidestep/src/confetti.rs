//! Confetti burst: particles that fall from the top edge, spin, fade, and are
//! dropped once their own animation has run out.

use crate::easing::EASE_OUT_QUAD;
use crate::geometry::Point;
use crate::swatch::Swatch;
use crate::validate::{self, ParamError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::{Duration, Instant};
use strum::Display;

pub const START_Y: f64 = -10.0;
pub const FALL_OVERSHOOT: f64 = 20.0;

pub const DEFAULT_COLORS: [Swatch; 4] = [
    Swatch::rgb(0xff, 0x85, 0xa2),
    Swatch::rgb(0xff, 0x6b, 0x9d),
    Swatch::rgb(0xff, 0xc4, 0xd6),
    Swatch::rgb(0xff, 0x4d, 0x7d),
];

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfettiParams {
    pub count: usize,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "stagger_ms")]
    pub stagger: Duration,
    pub min_size: f64,
    pub max_size: f64,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "min_lifetime_ms")]
    pub min_lifetime: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "max_lifetime_ms")]
    pub max_lifetime: Duration,
    /// Largest final rotation in degrees, either direction.
    pub max_spin: f64,
    pub colors: Vec<Swatch>,
}

impl Default for ConfettiParams {
    fn default() -> Self {
        Self {
            count: 80,
            stagger: Duration::from_millis(15),
            min_size: 4.0,
            max_size: 12.0,
            min_lifetime: Duration::from_millis(2500),
            max_lifetime: Duration::from_millis(4500),
            max_spin: 360.0,
            colors: DEFAULT_COLORS.to_vec(),
        }
    }
}

impl ConfettiParams {
    fn palette(&self) -> &[Swatch] {
        if self.colors.is_empty() {
            &DEFAULT_COLORS
        } else {
            &self.colors
        }
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        validate::count("count", self.count)?;
        validate::duration("stagger_ms", self.stagger)?;
        validate::non_negative("min_size", self.min_size)?;
        validate::non_negative("max_size", self.max_size)?;
        validate::duration("min_lifetime_ms", self.min_lifetime)?;
        validate::duration("max_lifetime_ms", self.max_lifetime)?;
        validate::finite("max_spin", self.max_spin)
    }

    /// Time from the start of a burst until its last particle has finished.
    pub fn burst_span(&self) -> Duration {
        self.stagger * self.count.saturating_sub(1) as u32 + self.max_lifetime
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Shape {
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub width: f64,
    pub height: f64,
    pub color: Swatch,
    pub shape: Shape,
    /// Horizontal start position.
    pub x: f64,
    /// Final rotation in degrees.
    pub spin: f64,
    pub lifetime: Duration,
    pub born: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleFrame {
    pub origin: Point,
    pub rotation: f64,
    pub opacity: f64,
}

fn span<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> f64 {
    rng.random_range(a.min(b)..=a.max(b))
}

impl Particle {
    pub fn random<R: Rng + ?Sized>(
        params: &ConfettiParams,
        born: Instant,
        viewport_width: f64,
        rng: &mut R,
    ) -> Self {
        let palette = params.palette();
        let lifetime_ms = {
            let lo = params.min_lifetime.as_millis() as u64;
            let hi = params.max_lifetime.as_millis() as u64;
            rng.random_range(lo.min(hi)..=lo.max(hi))
        };

        Self {
            width: span(rng, params.min_size, params.max_size),
            height: span(rng, params.min_size, params.max_size),
            color: palette[rng.random_range(0..palette.len())],
            shape: if rng.random_bool(0.5) {
                Shape::Round
            } else {
                Shape::Square
            },
            x: span(rng, 0.0, viewport_width.max(0.0)),
            spin: span(rng, -params.max_spin, params.max_spin),
            lifetime: Duration::from_millis(lifetime_ms),
            born,
        }
    }

    pub fn finished_at(&self) -> Instant {
        self.born + self.lifetime
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.finished_at() <= now
    }

    /// Linear progress, or `None` before birth and after the end.
    pub fn progress(&self, now: Instant) -> Option<f64> {
        if now < self.born || self.is_finished(now) {
            return None;
        }
        let elapsed = now.duration_since(self.born).as_secs_f64();
        Some(elapsed / self.lifetime.as_secs_f64())
    }

    pub fn frame_at(&self, now: Instant, viewport_height: f64) -> Option<ParticleFrame> {
        let eased = EASE_OUT_QUAD.ease(self.progress(now)?);
        Some(ParticleFrame {
            origin: Point::new(self.x, START_Y + eased * (viewport_height + FALL_OVERSHOOT)),
            rotation: eased * self.spin,
            opacity: 1.0 - eased,
        })
    }
}

/// All confetti currently queued or falling.
#[derive(Debug, Default)]
pub struct ConfettiField {
    particles: Vec<Particle>,
}

impl ConfettiField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a burst starting at `now`; particle `i` is born `i * stagger` later.
    pub fn burst<R: Rng + ?Sized>(
        &mut self,
        params: &ConfettiParams,
        now: Instant,
        viewport_width: f64,
        rng: &mut R,
    ) -> usize {
        self.particles.reserve(params.count);
        for i in 0..params.count {
            let born = now + params.stagger * i as u32;
            self.particles
                .push(Particle::random(params, born, viewport_width, rng));
        }
        log::debug!("confetti burst of {} particles", params.count);
        params.count
    }

    /// Drops every particle whose animation has completed. Returns how many
    /// were removed.
    pub fn advance(&mut self, now: Instant) -> usize {
        let before = self.particles.len();
        self.particles.retain(|p| !p.is_finished(now));
        before - self.particles.len()
    }

    /// Particles that are on screen at `now` together with their frame.
    pub fn frames(
        &self,
        now: Instant,
        viewport_height: f64,
    ) -> impl Iterator<Item = (&Particle, ParticleFrame)> + '_ {
        self.particles
            .iter()
            .filter_map(move |p| p.frame_at(now, viewport_height).map(|f| (p, f)))
    }

    pub fn spawned(&self, now: Instant) -> usize {
        self.particles.iter().filter(|p| p.born <= now).count()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
