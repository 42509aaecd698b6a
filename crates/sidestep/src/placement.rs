//! Random placement of the evading control with a deterministic fallback.

use crate::geometry::{Point, Rect, Size, Viewport};
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::validate::{self, ParamError};
use strum::Display;

pub const MARGIN: f64 = 20.0;
pub const MIN_DISTANCE: f64 = 180.0;
pub const BUFFER: f64 = 10.0;
pub const MAX_ATTEMPTS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlacementParams {
    /// Distance kept from every viewport edge.
    pub margin: f64,
    /// Required distance between the two control centers.
    pub min_distance: f64,
    /// Padding added around a candidate before the overlap test.
    pub buffer: f64,
    pub max_attempts: u32,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            margin: MARGIN,
            min_distance: MIN_DISTANCE,
            buffer: BUFFER,
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

impl PlacementParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        validate::non_negative("margin", self.margin)?;
        validate::finite("min_distance", self.min_distance)?;
        validate::finite("buffer", self.buffer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// The corner diagonally away from the quadrant holding `point`.
    pub fn opposite_of(point: Point, viewport: Viewport) -> Self {
        let right = point.x > viewport.width / 2.0;
        let below = point.y > viewport.height / 2.0;
        match (right, below) {
            (true, true) => Self::TopLeft,
            (true, false) => Self::BottomLeft,
            (false, true) => Self::TopRight,
            (false, false) => Self::BottomRight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// A random candidate passed both checks after `attempts` draws.
    Accepted { attempts: u32 },
    Fallback(Corner),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Point,
    pub outcome: Outcome,
}

impl Placement {
    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, Outcome::Fallback(_))
    }
}

/// Range of valid top-left positions for a control of a given size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// When the viewport is too small the upper bound collapses onto the lower one.
    pub fn new(viewport: Viewport, control: Size, margin: f64) -> Self {
        let min = Point::new(margin, margin);
        let max = Point::new(
            (viewport.width - control.width - margin).max(min.x),
            (viewport.height - control.height - margin).max(min.y),
        );
        Self { min, max }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        Point::new(
            rng.random_range(self.min.x..=self.max.x),
            rng.random_range(self.min.y..=self.max.y),
        )
    }

    fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => self.min,
            Corner::TopRight => Point::new(self.max.x, self.min.y),
            Corner::BottomLeft => Point::new(self.min.x, self.max.y),
            Corner::BottomRight => self.max,
        }
    }
}

/// Whether a control at `candidate` is far enough from `obstacle` and does not
/// touch it once padded by `buffer`.
pub fn is_clear(candidate: &Rect, obstacle: &Rect, params: &PlacementParams) -> bool {
    candidate.center().distance(obstacle.center()) > params.min_distance
        && candidate.inflate(params.buffer).is_clear_of(obstacle)
}

pub fn fallback(viewport: Viewport, obstacle: &Rect, control: Size, margin: f64) -> Placement {
    let corner = Corner::opposite_of(obstacle.center(), viewport);
    Placement {
        position: Bounds::new(viewport, control, margin).corner(corner),
        outcome: Outcome::Fallback(corner),
    }
}

/// Draws up to `max_attempts` random positions and returns the first clear
/// one, or the corner opposite the obstacle when none qualifies.
pub fn find_placement<R: Rng + ?Sized>(
    viewport: Viewport,
    obstacle: &Rect,
    control: Size,
    params: &PlacementParams,
    rng: &mut R,
) -> Placement {
    let bounds = Bounds::new(viewport, control, params.margin);

    (1..=params.max_attempts)
        .find_map(|attempt| {
            let position = bounds.sample(rng);
            is_clear(&Rect::at(position, control), obstacle, params).then_some(Placement {
                position,
                outcome: Outcome::Accepted { attempts: attempt },
            })
        })
        .unwrap_or_else(|| fallback(viewport, obstacle, control, params.margin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const CONTROL: Size = Size {
        width: 120.0,
        height: 48.0,
    };

    fn centered_obstacle(viewport: Viewport) -> Rect {
        let c = viewport.center();
        Rect::new(c.x - 70.0, c.y - 24.0, 140.0, 48.0)
    }

    #[test]
    fn test_placements_stay_inside_margins() {
        let params = PlacementParams::default();
        for (w, h) in [(1280.0, 800.0), (400.0, 700.0), (320.0, 240.0)] {
            let viewport = Viewport::new(w, h);
            let obstacle = centered_obstacle(viewport);
            let inner = viewport.bounds().inflate(-params.margin);
            for seed in 0..300 {
                let mut rng = StdRng::seed_from_u64(seed);
                let placement = find_placement(viewport, &obstacle, CONTROL, &params, &mut rng);
                let placed = Rect::at(placement.position, CONTROL);
                assert!(
                    inner.contains(&placed),
                    "seed {seed} in {w}x{h} left bounds: {placed:?}"
                );
            }
        }
    }

    #[test]
    fn test_outcome_is_clear_or_the_fallback_corner() {
        let params = PlacementParams::default();
        for (w, h) in [(1280.0, 800.0), (360.0, 420.0)] {
            let viewport = Viewport::new(w, h);
            let obstacle = Rect::new(w * 0.6, h * 0.3, 140.0, 48.0);
            let expected_fallback = fallback(viewport, &obstacle, CONTROL, params.margin);
            for seed in 0..300 {
                let mut rng = StdRng::seed_from_u64(seed);
                let placement = find_placement(viewport, &obstacle, CONTROL, &params, &mut rng);
                let placed = Rect::at(placement.position, CONTROL);
                match placement.outcome {
                    Outcome::Accepted { attempts } => {
                        assert!(attempts >= 1 && attempts <= params.max_attempts);
                        assert!(placed.center().distance(obstacle.center()) > params.min_distance);
                        assert!(placed.inflate(params.buffer).is_clear_of(&obstacle));
                    }
                    Outcome::Fallback(_) => assert_eq!(placement, expected_fallback),
                }
            }
        }
    }

    #[test]
    fn test_unreachable_target_falls_back_to_opposite_corner() {
        let viewport = Viewport::new(800.0, 600.0);
        // Covers the whole viewport; its center lies far to the lower right.
        let obstacle = Rect::new(-1_000.0, -1_000.0, 12_000.0, 12_000.0);
        let params = PlacementParams::default();
        let mut rng = StdRng::seed_from_u64(7);

        let placement = find_placement(viewport, &obstacle, CONTROL, &params, &mut rng);

        assert!(placement.is_fallback());
        assert_eq!(placement.outcome, Outcome::Fallback(Corner::TopLeft));
        assert_eq!(placement.position, Point::new(MARGIN, MARGIN));
    }

    #[test]
    fn test_fallback_corner_positions() {
        let viewport = Viewport::new(1000.0, 500.0);
        let margin = 20.0;
        let cases = [
            (Rect::new(800.0, 400.0, 50.0, 50.0), Point::new(20.0, 20.0)),
            (Rect::new(800.0, 50.0, 50.0, 50.0), Point::new(20.0, 432.0)),
            (Rect::new(50.0, 400.0, 50.0, 50.0), Point::new(860.0, 20.0)),
            (Rect::new(50.0, 50.0, 50.0, 50.0), Point::new(860.0, 432.0)),
        ];
        for (obstacle, expected) in cases {
            let placement = fallback(viewport, &obstacle, CONTROL, margin);
            assert_eq!(placement.position, expected, "obstacle {obstacle:?}");
        }
    }

    #[test]
    fn test_tiny_viewport_pins_to_margin() {
        let viewport = Viewport::new(100.0, 50.0);
        let obstacle = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut rng = StdRng::seed_from_u64(1);
        let placement = find_placement(
            viewport,
            &obstacle,
            CONTROL,
            &PlacementParams::default(),
            &mut rng,
        );
        assert_eq!(placement.position, Point::new(MARGIN, MARGIN));
    }

    #[test]
    fn test_same_seed_same_placement() {
        let viewport = Viewport::new(1280.0, 800.0);
        let obstacle = centered_obstacle(viewport);
        let params = PlacementParams::default();
        let a = find_placement(viewport, &obstacle, CONTROL, &params, &mut StdRng::seed_from_u64(42));
        let b = find_placement(viewport, &obstacle, CONTROL, &params, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
