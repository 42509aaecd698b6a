pub mod ambient;
pub mod celebration;
pub mod confetti;
pub mod easing;
pub mod evasion;
pub mod geometry;
pub mod placement;
pub mod swatch;
pub mod timer;
pub mod validate;

pub use celebration::{CelebrationSequencer, ClickTarget, Stage};
pub use evasion::EvasionController;
pub use geometry::{Point, Rect, Size, Viewport};
pub use placement::{Placement, PlacementParams, find_placement};
pub use timer::{Timer, TimerRequest};
pub use validate::ParamError;
