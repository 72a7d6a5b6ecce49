//! Ramer-Douglas-Peucker line simplification.

use super::types::PointZ;

/// Reduces the point count of a sequence while keeping every removed point
/// within `epsilon` of the simplified line (perpendicular distance).
///
/// A non-positive epsilon and sequences of fewer than three points pass
/// through unchanged. The first and last point of the input always survive.
///
/// Recursion depth is bounded by the input length; for the vertex counts a
/// map sheet produces this is well within the default stack.
pub fn ramer_douglas_peucker(line: &[PointZ], epsilon: f64) -> Vec<PointZ> {
    if epsilon <= 0.0 || line.len() < 3 {
        return line.to_vec();
    }

    let mut max_distance = 0.0;
    let mut max_index = 0;
    for i in 1..line.len() - 1 {
        let distance = perpendicular_distance(&line[i], &line[0], &line[line.len() - 1]);
        if distance > max_distance {
            max_distance = distance;
            max_index = i;
        }
    }

    if max_distance > epsilon {
        let mut left = ramer_douglas_peucker(&line[..=max_index], epsilon);
        let right = ramer_douglas_peucker(&line[max_index..], epsilon);
        left.pop(); // the split point is shared by both halves
        left.extend(right);
        left
    } else {
        vec![line[0], line[line.len() - 1]]
    }
}

/// Perpendicular distance from `p` to the infinite line through `start` and
/// `end`. When the chord endpoints coincide in the plane the distance
/// degrades to the plain Euclidean distance from that single point.
pub fn perpendicular_distance(p: &PointZ, start: &PointZ, end: &PointZ) -> f64 {
    if start.same_xy(end) {
        return ((start.x - p.x).powi(2) + (start.y - p.y).powi(2)).sqrt();
    }

    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let d = (dx * dx + dy * dy).sqrt();

    (p.x * dy - p.y * dx + end.x * start.y - end.y * start.x).abs() / d
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> PointZ {
        PointZ::new(x, y, 0.0)
    }

    #[test]
    fn test_perpendicular_distance() {
        // Distance from the origin to the horizontal line through y = 1.
        assert_relative_eq!(
            perpendicular_distance(&p(0.0, 0.0), &p(1.0, 1.0), &p(-1.0, 1.0)),
            1.0
        );
        assert_relative_eq!(
            perpendicular_distance(&p(0.0, 0.0), &p(-1.0, 1.0), &p(1.0, 1.0)),
            1.0
        );
        // A point on the line itself.
        assert_relative_eq!(
            perpendicular_distance(&p(0.0, 0.0), &p(1.0, -1.0), &p(-1.0, 1.0)),
            0.0
        );
        // Diagonal chord.
        assert_relative_eq!(
            perpendicular_distance(&p(0.0, 0.0), &p(0.0, -1.0), &p(-1.0, 0.0)),
            std::f64::consts::FRAC_1_SQRT_2
        );
    }

    #[test]
    fn test_perpendicular_distance_degenerate_chord() {
        assert_relative_eq!(
            perpendicular_distance(&p(3.0, 4.0), &p(0.0, 0.0), &p(0.0, 0.0)),
            5.0
        );
    }

    #[test]
    fn test_zero_epsilon_is_a_no_op() {
        let line = vec![p(0.0, 0.0), p(1.0, 0.5), p(2.0, 0.0), p(3.0, 0.5)];
        assert_eq!(ramer_douglas_peucker(&line, 0.0), line);
    }

    #[test]
    fn test_short_input_is_a_no_op() {
        let line = vec![p(0.0, 0.0), p(5.0, 5.0)];
        assert_eq!(ramer_douglas_peucker(&line, 100.0), line);
    }

    #[test]
    fn test_collapses_within_tolerance() {
        let line: Vec<PointZ> = vec![
            p(0.0, -1000.0),
            p(0.0, -800.0),
            p(0.0, -600.0),
            p(0.0, -400.0),
            p(0.0, -200.0),
            p(101.0, 0.0),
            p(0.0, 200.0),
            p(0.0, 400.0),
            p(0.0, 600.0),
            p(0.0, 800.0),
            p(0.0, 1000.0),
        ];
        assert_eq!(
            ramer_douglas_peucker(&line, 100.0),
            vec![p(0.0, -1000.0), p(101.0, 0.0), p(0.0, 1000.0)]
        );
    }

    #[test]
    fn test_keeps_significant_shoulder_points() {
        let line: Vec<PointZ> = vec![
            p(0.0, -1000.0),
            p(0.0, -800.0),
            p(0.0, -600.0),
            p(0.0, -400.0),
            p(0.0, -200.0),
            p(200.0, 0.0),
            p(0.0, 200.0),
            p(0.0, 400.0),
            p(0.0, 600.0),
            p(0.0, 800.0),
            p(0.0, 1000.0),
        ];
        assert_eq!(
            ramer_douglas_peucker(&line, 100.0),
            vec![
                p(0.0, -1000.0),
                p(0.0, -200.0),
                p(200.0, 0.0),
                p(0.0, 200.0),
                p(0.0, 1000.0)
            ]
        );
    }

    #[test]
    fn test_endpoints_always_survive() {
        let line: Vec<PointZ> = (0..50)
            .map(|i| p(i as f64, if i % 2 == 0 { 0.0 } else { 0.3 }))
            .collect();
        let simplified = ramer_douglas_peucker(&line, 1.0);
        assert_eq!(simplified.first(), line.first());
        assert_eq!(simplified.last(), line.last());
        assert!(simplified.len() <= line.len());
    }

    #[test]
    fn test_closed_ring_stays_closed() {
        let ring = vec![
            p(0.0, 0.0),
            p(10.0, 0.1),
            p(20.0, 0.0),
            p(20.0, 20.0),
            p(0.0, 0.0),
        ];
        let simplified = ramer_douglas_peucker(&ring, 1.0);
        assert!(simplified.first().unwrap().same_xy(simplified.last().unwrap()));
    }
}
