pub mod model;
pub mod view;

pub use model::Scene;
pub use view::{draw_ambient, draw_confetti};
