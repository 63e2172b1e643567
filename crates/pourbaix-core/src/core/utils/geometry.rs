use nalgebra::{Point2, Vector2};

pub type Polygon = Vec<Point2<f64>>;

/// The closed half-plane `normal · p + offset <= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPlane {
    pub normal: Vector2<f64>,
    pub offset: f64,
}

impl HalfPlane {
    pub fn new(normal: Vector2<f64>, offset: f64) -> Self {
        Self { normal, offset }
    }

    #[inline]
    pub fn signed_value(&self, point: &Point2<f64>) -> f64 {
        self.normal.dot(&point.coords) + self.offset
    }

    /// A half-plane with a vanishing normal either contains everything or nothing.
    pub fn is_degenerate(&self, tolerance: f64) -> bool {
        self.normal.amax() <= tolerance
    }
}

/// Axis-aligned rectangle with counter-clockwise vertex order.
pub fn rectangle(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Polygon {
    vec![
        Point2::new(x_min, y_min),
        Point2::new(x_max, y_min),
        Point2::new(x_max, y_max),
        Point2::new(x_min, y_max),
    ]
}

/// Clips a convex polygon against a half-plane (one Sutherland–Hodgman pass).
///
/// Points within `tolerance` of the boundary count as inside, so planes that
/// touch a region along an edge do not erase it.
pub fn clip_polygon(polygon: &[Point2<f64>], half_plane: &HalfPlane, tolerance: f64) -> Polygon {
    if polygon.is_empty() {
        return Vec::new();
    }
    if half_plane.is_degenerate(tolerance) {
        return if half_plane.offset <= tolerance {
            polygon.to_vec()
        } else {
            Vec::new()
        };
    }

    let mut output = Vec::with_capacity(polygon.len() + 1);
    let n = polygon.len();
    for i in 0..n {
        let current = polygon[i];
        let next = polygon[(i + 1) % n];
        let d_current = half_plane.signed_value(&current);
        let d_next = half_plane.signed_value(&next);
        let current_inside = d_current <= tolerance;
        let next_inside = d_next <= tolerance;

        if current_inside {
            output.push(current);
        }
        if current_inside != next_inside {
            let t = d_current / (d_current - d_next);
            output.push(current + (next - current) * t);
        }
    }
    dedup_vertices(output, tolerance)
}

/// Removes consecutive (and wrap-around) vertices closer than `tolerance`.
pub fn dedup_vertices(polygon: Polygon, tolerance: f64) -> Polygon {
    let mut result: Polygon = Vec::with_capacity(polygon.len());
    for p in polygon {
        if result
            .last()
            .is_none_or(|last: &Point2<f64>| (p - *last).norm() > tolerance)
        {
            result.push(p);
        }
    }
    while result.len() > 1 {
        let (first, last) = (result[0], result[result.len() - 1]);
        if (first - last).norm() > tolerance {
            break;
        }
        result.pop();
    }
    result
}

/// Signed shoelace area; positive for counter-clockwise polygons.
pub fn signed_area(polygon: &[Point2<f64>]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        * 0.5
}

pub fn area(polygon: &[Point2<f64>]) -> f64 {
    signed_area(polygon).abs()
}

/// Area centroid, falling back to the vertex mean for degenerate polygons.
pub fn centroid(polygon: &[Point2<f64>]) -> Option<Point2<f64>> {
    if polygon.is_empty() {
        return None;
    }
    let a = signed_area(polygon);
    if a.abs() < 1e-12 {
        let sum = polygon
            .iter()
            .fold(Vector2::<f64>::zeros(), |acc, p| acc + p.coords);
        return Some(Point2::from(sum / polygon.len() as f64));
    }
    let n = polygon.len();
    let mut c = Vector2::<f64>::zeros();
    for i in 0..n {
        let p = polygon[i];
        let q = polygon[(i + 1) % n];
        let cross = p.x * q.y - q.x * p.y;
        c += (p.coords + q.coords) * cross;
    }
    Some(Point2::from(c / (6.0 * a)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn rectangle_is_counter_clockwise() {
        let rect = rectangle(0.0, 14.0, -2.0, 2.0);
        assert!(signed_area(&rect) > 0.0);
        assert!(approx(area(&rect), 56.0));
    }

    #[test]
    fn clip_polygon_keeps_inside_portion() {
        let square = rectangle(0.0, 2.0, 0.0, 2.0);
        // x - 1 <= 0
        let clipped = clip_polygon(&square, &HalfPlane::new(Vector2::new(1.0, 0.0), -1.0), TOL);
        assert_eq!(clipped.len(), 4);
        assert!(approx(area(&clipped), 2.0));
        assert!(clipped.iter().all(|p| p.x <= 1.0 + TOL));
    }

    #[test]
    fn clip_polygon_diagonal_cut_produces_triangle() {
        let square = rectangle(0.0, 1.0, 0.0, 1.0);
        // x + y - 1 <= 0
        let clipped = clip_polygon(&square, &HalfPlane::new(Vector2::new(1.0, 1.0), -1.0), TOL);
        assert_eq!(clipped.len(), 3);
        assert!(approx(area(&clipped), 0.5));
    }

    #[test]
    fn clip_polygon_fully_outside_is_empty() {
        let square = rectangle(0.0, 1.0, 0.0, 1.0);
        let clipped = clip_polygon(&square, &HalfPlane::new(Vector2::new(1.0, 0.0), 5.0), TOL);
        assert!(clipped.is_empty() || area(&clipped) < TOL);
    }

    #[test]
    fn degenerate_half_plane_keeps_or_removes_everything() {
        let square = rectangle(0.0, 1.0, 0.0, 1.0);
        let keep = clip_polygon(&square, &HalfPlane::new(Vector2::zeros(), -1.0), TOL);
        assert_eq!(keep, square);
        let tie = clip_polygon(&square, &HalfPlane::new(Vector2::zeros(), 0.0), TOL);
        assert_eq!(tie, square);
        let drop = clip_polygon(&square, &HalfPlane::new(Vector2::zeros(), 1.0), TOL);
        assert!(drop.is_empty());
    }

    #[test]
    fn centroid_of_rectangle_is_its_center() {
        let rect = rectangle(0.0, 14.0, -2.0, 2.0);
        let c = centroid(&rect).unwrap();
        assert!(approx(c.x, 7.0));
        assert!(approx(c.y, 0.0));
    }

    #[test]
    fn dedup_vertices_removes_repeats_and_wraparound() {
        let poly = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        let cleaned = dedup_vertices(poly, TOL);
        assert_eq!(cleaned.len(), 3);
    }
}
