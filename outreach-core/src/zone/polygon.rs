//! Planar point-in-polygon test over `(longitude, latitude)` rings.

/// Ray-casting containment test.
///
/// Casts a horizontal ray from `(x, y)` and toggles on every crossed edge,
/// including the closing edge from the last vertex back to the first. An
/// edge counts when `min(y1, y2) < y <= max(y1, y2)` and the point is not to
/// the right of the edge.
pub(crate) fn contains(ring: &[(f64, f64)], x: f64, y: f64) -> bool {
    let Some(&last) = ring.last() else {
        return false;
    };

    let mut inside = false;
    let mut previous = last;
    for &current in ring {
        let (x1, y1) = previous;
        let (x2, y2) = current;
        if y1.min(y2) < y && y <= y1.max(y2) && x <= x1.max(x2) {
            let crosses = if x1 == x2 {
                true
            } else {
                let x_intersection = if y1 == y2 {
                    x1
                } else {
                    (y - y1) * (x2 - x1) / (y2 - y1) + x1
                };
                x <= x_intersection
            };
            if crosses {
                inside = !inside;
            }
        }
        previous = current;
    }
    inside
}

/// Arithmetic mean of the ring's vertices.
pub(crate) fn vertex_mean(ring: &[(f64, f64)]) -> (f64, f64) {
    let count = ring.len() as f64;
    let (sum_x, sum_y) = ring
        .iter()
        .fold((0.0, 0.0), |(sum_x, sum_y), &(x, y)| (sum_x + x, sum_y + y));
    (sum_x / count, sum_y / count)
}
