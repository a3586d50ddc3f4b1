//! Closed 2D cross-sections swept by the sweep builders.
//!
//! A profile lives in `(u, v)` parameter space. Sweeps map `u` onto the
//! y axis and `v` onto the z axis, each scaled by its own function of the
//! sweep parameter.

use std::f64::consts::{PI, TAU};

use crate::error::{DomainError, Result};
use crate::math::{signed_area, Point2, TOLERANCE};

/// An ordered, implicitly closed polyline of at least three points.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    points: Vec<Point2>,
}

impl Profile {
    /// Wraps an arbitrary polygon.
    ///
    /// The traversal order is kept as given. Builders read the winding from
    /// [`Profile::is_counter_clockwise`] and orient faces to match. Sweep
    /// caps are fanned from point 0, so every point must be visible from it:
    /// each triangle `(p_0, p_j, p_j+1)` winds the same way as the polygon.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] if there are fewer than three points, a
    /// coordinate is not finite, two consecutive points coincide (last and
    /// first included), the polygon encloses no area, or a cap triangle
    /// fanned from point 0 is flat or folds back.
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        let n = points.len();
        if n < 3 {
            return Err(DomainError::TooFewPoints(n).into());
        }
        if let Some(index) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(DomainError::NonFinitePoint(index).into());
        }
        for first in 0..n {
            let second = (first + 1) % n;
            if (points[second] - points[first]).norm() < TOLERANCE {
                return Err(DomainError::CoincidentPoints { first, second }.into());
            }
        }
        let area = signed_area(&points);
        if area.abs() < TOLERANCE {
            return Err(DomainError::DegenerateProfile.into());
        }
        if let Some(j) = (1..n - 1).find(|&j| {
            let (a, b) = (points[j] - points[0], points[j + 1] - points[0]);
            area.signum() * 0.5 * (a.x * b.y - a.y * b.x) <= TOLERANCE
        }) {
            return Err(DomainError::FoldedCap(j).into());
        }
        Ok(Self { points })
    }

    /// Unit circle with `num_points` evenly spaced points, counter-clockwise,
    /// the first one at `start_angle`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::TooFewPoints`] if `num_points < 3`.
    pub fn circle(num_points: usize, start_angle: f64) -> Result<Self> {
        if num_points < 3 {
            return Err(DomainError::TooFewPoints(num_points).into());
        }
        let step = TAU / num_points as f64;
        Self::new(
            (0..num_points)
                .map(|i| {
                    let (sin, cos) = (start_angle + step * i as f64).sin_cos();
                    Point2::new(cos, sin)
                })
                .collect(),
        )
    }

    /// Upper half of the unit circle standing on its diameter.
    ///
    /// Both ends of the diameter, `(1, 0)` and `(-1, 0)`, are included; the
    /// diameter itself is the closing segment.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::TooFewPoints`] if `num_points < 3`.
    pub fn semicircle(num_points: usize) -> Result<Self> {
        if num_points < 3 {
            return Err(DomainError::TooFewPoints(num_points).into());
        }
        let step = PI / (num_points - 1) as f64;
        Self::new(
            (0..num_points)
                .map(|i| {
                    let (sin, cos) = (step * i as f64).sin_cos();
                    Point2::new(cos, sin)
                })
                .collect(),
        )
    }

    /// Square of side 2 centred on the origin.
    #[must_use]
    pub fn square_centered() -> Self {
        Self::from_known(vec![
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, -1.0),
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, 1.0),
        ])
    }

    /// Square of side 2 standing on the `v = 0` line.
    #[must_use]
    pub fn square_on_base() -> Self {
        Self::from_known(vec![
            Point2::new(-1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(-1.0, 2.0),
        ])
    }

    /// Equilateral triangle with base `[-1, 1]` on `v = 0`.
    #[must_use]
    pub fn equilateral_triangle() -> Self {
        Self::from_known(vec![
            Point2::new(-1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 3.0_f64.sqrt()),
        ])
    }

    /// Right triangle with legs of length 2 and the right angle at `(-1, 0)`.
    #[must_use]
    pub fn right_triangle() -> Self {
        Self::from_known(vec![
            Point2::new(-1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(-1.0, 2.0),
        ])
    }

    // Constant shapes above satisfy every check in `new`.
    fn from_known(points: Vec<Point2>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Number of points; always at least 3.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no points, which a built profile never has.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed enclosed area, positive for counter-clockwise traversal.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }

    #[must_use]
    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::SolidusError;
    use approx::assert_relative_eq;

    fn p(u: f64, v: f64) -> Point2 {
        Point2::new(u, v)
    }

    #[test]
    fn circle_points_are_on_unit_circle() {
        let circle = Profile::circle(12, 0.0).unwrap();
        assert_eq!(circle.len(), 12);
        for pt in circle.points() {
            assert_relative_eq!(pt.coords.norm(), 1.0, epsilon = 1e-12);
        }
        assert!(circle.is_counter_clockwise());
    }

    #[test]
    fn circle_respects_start_angle() {
        let circle = Profile::circle(4, std::f64::consts::FRAC_PI_2).unwrap();
        let first = circle.points()[0];
        assert_relative_eq!(first.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(first.y, 1.0);
    }

    #[test]
    fn circle_area_approaches_pi() {
        let circle = Profile::circle(400, 0.0).unwrap();
        assert_relative_eq!(circle.signed_area(), PI, epsilon = 1e-3);
    }

    #[test]
    fn semicircle_spans_diameter() {
        let half = Profile::semicircle(5).unwrap();
        let pts = half.points();
        assert_eq!(pts.len(), 5);
        assert_relative_eq!(pts[0].x, 1.0);
        assert_relative_eq!(pts[4].x, -1.0);
        assert_relative_eq!(pts[4].y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(pts[2].y, 1.0);
        assert!(half.is_counter_clockwise());
    }

    #[test]
    fn predefined_shapes_are_valid_polygons() {
        for shape in [
            Profile::square_centered(),
            Profile::square_on_base(),
            Profile::equilateral_triangle(),
            Profile::right_triangle(),
        ] {
            let rebuilt = Profile::new(shape.points().to_vec()).unwrap();
            assert_eq!(rebuilt, shape);
            assert!(shape.is_counter_clockwise());
        }
    }

    #[test]
    fn square_on_base_area() {
        assert_relative_eq!(Profile::square_on_base().signed_area(), 4.0);
    }

    #[test]
    fn clockwise_order_is_kept() {
        let cw = Profile::new(vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 0.0)]).unwrap();
        assert!(!cw.is_counter_clockwise());
        assert_eq!(cw.points()[1], p(0.0, 1.0));
    }

    #[test]
    fn two_points_rejected() {
        let err = Profile::new(vec![p(0.0, 0.0), p(1.0, 0.0)]).unwrap_err();
        assert!(matches!(err, SolidusError::Domain(DomainError::TooFewPoints(2))));
    }

    #[test]
    fn small_circle_rejected() {
        assert!(Profile::circle(2, 0.0).is_err());
        assert!(Profile::semicircle(2).is_err());
    }

    #[test]
    fn repeated_point_rejected() {
        let err =
            Profile::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)]).unwrap_err();
        assert!(matches!(
            err,
            SolidusError::Domain(DomainError::CoincidentPoints { first: 1, second: 2 })
        ));
    }

    #[test]
    fn closing_duplicate_rejected() {
        let err =
            Profile::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(0.0, 0.0)]).unwrap_err();
        assert!(matches!(
            err,
            SolidusError::Domain(DomainError::CoincidentPoints { first: 3, second: 0 })
        ));
    }

    #[test]
    fn collinear_points_rejected() {
        let err = Profile::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]).unwrap_err();
        assert!(matches!(err, SolidusError::Domain(DomainError::DegenerateProfile)));
    }

    #[test]
    fn nan_point_rejected() {
        let err = Profile::new(vec![p(0.0, 0.0), p(f64::NAN, 0.0), p(0.0, 1.0)]).unwrap_err();
        assert!(matches!(err, SolidusError::Domain(DomainError::NonFinitePoint(1))));
    }

    #[test]
    fn cap_fan_must_not_fold() {
        // a dart fans cleanly from its tail but folds when fanned from a tip
        let notch_first = vec![p(0.0, 0.0), p(2.0, -1.0), p(1.0, 0.0), p(2.0, 1.0)];
        assert!(Profile::new(notch_first).is_ok());
        let tip_first = vec![p(2.0, -1.0), p(1.0, 0.0), p(2.0, 1.0), p(0.0, 0.0)];
        let err = Profile::new(tip_first).unwrap_err();
        assert!(matches!(err, SolidusError::Domain(DomainError::FoldedCap(1))));
    }

    #[test]
    fn clockwise_fan_checked_against_its_own_winding() {
        let cw = vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)];
        assert!(Profile::new(cw).is_ok());
        let flat_cap = vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(1.0, 1.0)];
        let err = Profile::new(flat_cap).unwrap_err();
        assert!(matches!(err, SolidusError::Domain(DomainError::FoldedCap(1))));
    }
}
