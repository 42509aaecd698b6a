use rand::Rng;
use sidestep::ambient::{AmbientField, AmbientParams};
use sidestep::confetti::{ConfettiField, ConfettiParams};
use std::time::{Duration, Instant};

/// Everything drawn behind and above the widgets, sampled once per frame.
pub struct Scene {
    pub confetti: ConfettiField,
    pub ambient: AmbientField,
    pub started: Instant,
    pub now: Instant,
}

impl Scene {
    pub fn new<R: Rng + ?Sized>(ambient: &AmbientParams, rng: &mut R) -> Self {
        let now = Instant::now();
        Self {
            confetti: ConfettiField::new(),
            ambient: AmbientField::new(ambient, rng),
            started: now,
            now,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.now.duration_since(self.started)
    }

    pub fn tick(&mut self, now: Instant) {
        self.now = now;
        let removed = self.confetti.advance(now);
        if removed > 0 && self.confetti.is_empty() {
            log::debug!("confetti settled");
        }
    }

    pub fn burst<R: Rng + ?Sized>(&mut self, params: &ConfettiParams, width: f64, rng: &mut R) {
        self.confetti.burst(params, Instant::now(), width, rng);
    }

    pub fn reseed_ambient<R: Rng + ?Sized>(&mut self, params: &AmbientParams, rng: &mut R) {
        self.ambient = AmbientField::new(params, rng);
    }
}
