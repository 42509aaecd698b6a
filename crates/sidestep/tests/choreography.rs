use rand::SeedableRng;
use rand::rngs::StdRng;
use sidestep::celebration::{self, CelebrationSequencer, ClickTarget, Stage};
use sidestep::confetti::{ConfettiField, ConfettiParams};
use sidestep::evasion::{self, EvasionController, Phase};
use sidestep::{Point, Rect, Timer, TimerRequest, Viewport};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Virtual main loop: owns armed timers and applies effects the way the GTK
/// front end does, without a display.
struct Harness {
    start: Instant,
    now: Instant,
    timers: HashMap<Timer, Instant>,
    evasion: EvasionController,
    celebration: CelebrationSequencer,
    confetti: ConfettiField,
    rng: StdRng,
    viewport: Viewport,
    yes: Rect,
    no: Rect,
    docked: bool,
    tilt_cleared: bool,
}

impl Harness {
    fn new(seed: u64) -> Self {
        let start = Instant::now();
        Self {
            start,
            now: start,
            timers: HashMap::new(),
            evasion: EvasionController::default(),
            celebration: CelebrationSequencer::default(),
            confetti: ConfettiField::new(),
            rng: StdRng::seed_from_u64(seed),
            viewport: Viewport::new(1280.0, 800.0),
            yes: Rect::new(520.0, 400.0, 120.0, 48.0),
            no: Rect::new(660.0, 400.0, 100.0, 48.0),
            docked: true,
            tilt_cleared: true,
        }
    }

    fn timer(&mut self, request: TimerRequest) {
        match request {
            TimerRequest::Arm(timer, after) => {
                self.timers.insert(timer, self.now + after);
            }
            TimerRequest::Disarm(timer) => {
                self.timers.remove(&timer);
            }
        }
    }

    fn apply_evasion(&mut self, effects: Vec<evasion::Effect>) {
        for effect in effects {
            match effect {
                evasion::Effect::Place { position, .. } => {
                    self.no = Rect::at(position, self.no.size());
                    self.docked = false;
                    self.tilt_cleared = false;
                }
                evasion::Effect::Straighten => self.tilt_cleared = true,
                evasion::Effect::Dock => {
                    self.no = Rect::new(660.0, 400.0, 100.0, 48.0);
                    self.docked = true;
                    self.tilt_cleared = true;
                }
                evasion::Effect::Timer(request) => self.timer(request),
            }
        }
    }

    fn apply_celebration(&mut self, effects: Vec<celebration::Effect>) {
        for effect in effects {
            match effect {
                celebration::Effect::Show(_) => {}
                celebration::Effect::Confetti => {
                    let width = self.viewport.width;
                    self.confetti
                        .burst(&ConfettiParams::default(), self.now, width, &mut self.rng);
                }
                celebration::Effect::Timer(request) => self.timer(request),
            }
        }
    }

    fn relocate(&mut self) {
        let effects = self
            .evasion
            .relocate(self.viewport, self.yes, self.no, &mut self.rng);
        self.apply_evasion(effects);
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let effects = self.evasion.on_resize();
        self.apply_evasion(effects);
    }

    fn affirm(&mut self) {
        let effects = self.celebration.affirm();
        self.apply_celebration(effects);
    }

    fn dismiss(&mut self, target: ClickTarget) {
        let effects = self.celebration.dismiss(target);
        self.apply_celebration(effects);
    }

    fn advance(&mut self, by: Duration) {
        let target = self.now + by;
        loop {
            let next = self
                .timers
                .iter()
                .filter(|(_, at)| **at <= target)
                .min_by_key(|(_, at)| **at)
                .map(|(t, at)| (*t, *at));
            let Some((timer, at)) = next else { break };
            self.timers.remove(&timer);
            self.now = at;
            let e = self.evasion.fire(timer);
            self.apply_evasion(e);
            let c = self.celebration.fire(timer);
            self.apply_celebration(c);
        }
        self.now = target;
        self.confetti.advance(self.now);
    }

    fn elapsed(&self) -> Duration {
        self.now - self.start
    }
}

#[test]
fn relocations_stay_in_bounds_and_clear_of_yes() {
    let mut h = Harness::new(17);
    let inner = h.viewport.bounds().inflate(-20.0);

    for _ in 0..200 {
        h.relocate();
        assert!(inner.contains(&h.no), "{:?} outside {:?}", h.no, inner);
        let clear = h.no.center().distance(h.yes.center()) > 180.0
            && h.no.inflate(10.0).is_clear_of(&h.yes);
        assert!(clear, "placement {:?} too close to {:?}", h.no, h.yes);
        h.advance(Duration::from_millis(250));
        assert!(h.tilt_cleared);
    }
}

#[test]
fn rapid_retriggers_keep_the_first_target() {
    let mut h = Harness::new(23);
    h.relocate();
    let target = h.no;

    for _ in 0..5 {
        h.advance(Duration::from_millis(40));
        h.relocate();
        assert_eq!(h.no, target);
    }

    // 200ms elapsed, still inside the settle window
    assert!(h.evasion.is_moving());
    h.advance(Duration::from_millis(50));
    assert!(!h.evasion.is_moving());
    assert_eq!(h.evasion.phase(), Phase::Displaced { position: target.origin() });

    h.relocate();
    assert_ne!(h.no, target);
}

#[test]
fn resize_redocks_after_debounce() {
    let mut h = Harness::new(31);
    h.relocate();
    h.advance(Duration::from_millis(300));
    assert!(!h.docked);

    h.resize(Viewport::new(1000.0, 700.0));
    h.advance(Duration::from_millis(100));
    h.resize(Viewport::new(900.0, 650.0));
    h.advance(Duration::from_millis(200));
    assert!(!h.docked, "debounce restarted by the second resize");

    h.advance(Duration::from_millis(50));
    assert!(h.docked);
    assert!(h.tilt_cleared);
    assert_eq!(h.no, Rect::new(660.0, 400.0, 100.0, 48.0));
    assert_eq!(h.evasion.phase(), Phase::Docked);
}

#[test]
fn affirm_runs_the_whole_celebration() {
    let mut h = Harness::new(5);

    h.affirm();
    assert_eq!(h.celebration.stage(), Stage::PrimaryOpen);
    assert_eq!(h.confetti.len(), 80);

    h.advance(Duration::from_millis(1500));
    assert_eq!(h.confetti.spawned(h.now), 80);

    h.dismiss(ClickTarget::Content);
    assert_eq!(h.celebration.stage(), Stage::PrimaryOpen);

    h.dismiss(ClickTarget::CloseButton);
    assert_eq!(h.celebration.stage(), Stage::SecondaryOpen);

    h.advance(Duration::from_millis(4999));
    assert_eq!(h.celebration.stage(), Stage::SecondaryOpen);
    h.advance(Duration::from_millis(1));
    assert_eq!(h.celebration.stage(), Stage::Idle);
    assert_eq!(h.elapsed(), Duration::from_millis(6500));
}

#[test]
fn confetti_never_leaks() {
    let mut h = Harness::new(8);
    h.affirm();
    h.dismiss(ClickTarget::Backdrop);
    h.dismiss(ClickTarget::Backdrop);
    assert_eq!(h.celebration.stage(), Stage::Idle);

    h.affirm();
    assert_eq!(h.confetti.len(), 160);

    h.advance(ConfettiParams::default().burst_span());
    assert!(h.confetti.is_empty());
    assert!(h.confetti.frames(h.now, 800.0).next().is_none());
}

#[test]
fn dialogs_and_evasion_do_not_interfere() {
    let mut h = Harness::new(41);
    h.affirm();
    h.relocate();
    h.dismiss(ClickTarget::Root);

    h.advance(Duration::from_millis(250));
    assert_eq!(
        h.evasion.phase(),
        Phase::Displaced {
            position: Point::new(h.no.left, h.no.top)
        }
    );
    assert_eq!(h.celebration.stage(), Stage::SecondaryOpen);

    h.advance(Duration::from_millis(4750));
    assert_eq!(h.celebration.stage(), Stage::Idle);
}
