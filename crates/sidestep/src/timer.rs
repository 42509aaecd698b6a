use std::time::Duration;
use strum::Display;

/// Named one-shot timers. Each name has at most one armed instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Timer {
    Settle,
    ResizeDebounce,
    SecondaryAutoClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerRequest {
    /// Start `timer`, replacing any instance that is already armed.
    Arm(Timer, Duration),
    Disarm(Timer),
}
