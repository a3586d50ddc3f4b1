/// 2D point type, used for profile coordinates `(u, v)`.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Point on a circle of radius `radius` around the z axis at angle `theta`.
#[must_use]
pub fn polar(radius: f64, theta: f64, z: f64) -> Point3 {
    let (sin, cos) = theta.sin_cos();
    Point3::new(radius * cos, radius * sin, z)
}

/// Signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ccw_square_has_positive_area() {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        assert_relative_eq!(signed_area(&square), 4.0);
    }

    #[test]
    fn cw_triangle_has_negative_area() {
        let tri = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 0.0),
        ];
        assert_relative_eq!(signed_area(&tri), -0.5);
    }

    #[test]
    fn too_few_points_is_zero() {
        assert_eq!(signed_area(&[Point2::new(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn polar_lies_on_circle() {
        let p = polar(2.0, std::f64::consts::FRAC_PI_2, 3.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0);
        assert_relative_eq!(p.z, 3.0);
    }
}
