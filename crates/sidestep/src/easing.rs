/// CSS-style `cubic-bezier(x1, y1, x2, y2)` timing curve with fixed endpoints
/// at (0, 0) and (1, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

/// `cubic-bezier(0.25, 0.46, 0.45, 0.94)`, a gentle ease-out.
pub const EASE_OUT_QUAD: CubicBezier = CubicBezier::new(0.25, 0.46, 0.45, 0.94);

const NEWTON_ITERATIONS: usize = 8;
const EPSILON: f64 = 1e-6;

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn coordinate(t: f64, p1: f64, p2: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }

    fn slope(t: f64, p1: f64, p2: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
    }

    /// Parameter `t` whose x coordinate equals `x`.
    fn solve_t(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = Self::coordinate(t, self.x1, self.x2) - x;
            if err.abs() < EPSILON {
                return t;
            }
            let d = Self::slope(t, self.x1, self.x2);
            if d.abs() < EPSILON {
                break;
            }
            t -= err / d;
        }

        // bisection when newton stalls
        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        while hi - lo > EPSILON {
            let value = Self::coordinate(t, self.x1, self.x2);
            if (value - x).abs() < EPSILON {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    /// Eased progress for linear progress `x` in `[0, 1]`.
    pub fn ease(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        if x == 0.0 || x == 1.0 {
            return x;
        }
        Self::coordinate(self.solve_t(x), self.y1, self.y2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_fixed() {
        assert_eq!(EASE_OUT_QUAD.ease(0.0), 0.0);
        assert_eq!(EASE_OUT_QUAD.ease(1.0), 1.0);
        assert_eq!(EASE_OUT_QUAD.ease(-3.0), 0.0);
        assert_eq!(EASE_OUT_QUAD.ease(7.0), 1.0);
    }

    #[test]
    fn test_ease_out_is_monotonic_and_ahead_of_linear() {
        let mut previous = 0.0;
        for step in 1..100 {
            let x = step as f64 / 100.0;
            let y = EASE_OUT_QUAD.ease(x);
            assert!(y >= previous, "not monotonic at {x}");
            assert!(y >= x - 1e-3, "ease-out fell behind linear at {x}");
            previous = y;
        }
    }

    #[test]
    fn test_linear_curve_is_identity() {
        let linear = CubicBezier::new(0.0, 0.0, 1.0, 1.0);
        for x in [0.1, 0.25, 0.5, 0.9] {
            assert!((linear.ease(x) - x).abs() < 1e-4);
        }
    }
}
