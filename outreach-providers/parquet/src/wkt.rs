//! Minimal reader for the outer ring of WKT polygons.

/// Extracts the outer ring of a `POLYGON` or `MULTIPOLYGON` as
/// `(longitude, latitude)` pairs.
///
/// Matching is case-insensitive and multipolygons are read as a single
/// polygon: everything between the first `((` and the last `))` is split on
/// commas, and only entries holding exactly two numbers are kept. Returns
/// `None` when fewer than three vertices survive.
///
/// # Examples
/// ```
/// use outreach_providers_parquet::parse_wkt_polygon;
///
/// let ring = parse_wkt_polygon("POLYGON ((0 0, 4 0, 4 4, 0 0))").expect("valid ring");
/// assert_eq!(ring, vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 0.0)]);
/// assert_eq!(parse_wkt_polygon("POINT (1 2)"), None);
/// ```
#[must_use]
pub fn parse_wkt_polygon(text: &str) -> Option<Vec<(f64, f64)>> {
    let upper = text.to_ascii_uppercase().replace("MULTIPOLYGON", "POLYGON");
    if !upper.contains("POLYGON") {
        return None;
    }
    let start = upper.find("((")? + 2;
    let end = upper.rfind("))")?;
    let body = upper.get(start..end)?;

    let vertices: Vec<(f64, f64)> = body.split(',').filter_map(parse_vertex).collect();
    (vertices.len() >= 3).then_some(vertices)
}

fn parse_vertex(entry: &str) -> Option<(f64, f64)> {
    let cleaned = entry.replace(['(', ')'], " ");
    let mut tokens = cleaned.split_whitespace();
    let x = tokens.next()?.parse().ok()?;
    let y = tokens.next()?.parse().ok()?;
    tokens.next().is_none().then_some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::lowercase("polygon((0 0, 1 0, 1 1))")]
    #[case::spaced("POLYGON ((0 0,1 0 , 1 1 ))")]
    #[case::multi("MultiPolygon (((0 0, 1 0, 1 1)))")]
    fn reads_the_outer_ring(#[case] text: &str) {
        assert_eq!(
            parse_wkt_polygon(text),
            Some(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)])
        );
    }

    #[test]
    fn keeps_negative_and_fractional_coordinates() {
        let ring = parse_wkt_polygon("POLYGON ((-77.1 -12.05, -77.0 -12.05, -77.0 -11.9))")
            .expect("three vertices");
        assert_eq!(ring[0], (-77.1, -12.05));
        assert_eq!(ring[2], (-77.0, -11.9));
    }

    #[rstest]
    #[case::three_numbers("POLYGON ((0 0 5, 1 0, 1 1, 0 1))", 3)]
    #[case::garbage("POLYGON ((0 0, x y, 1 0, 1 1))", 3)]
    fn skips_malformed_vertices(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(parse_wkt_polygon(text).map(|ring| ring.len()), Some(expected));
    }

    #[rstest]
    #[case::too_few("POLYGON ((0 0, 1 1))")]
    #[case::no_ring("POLYGON EMPTY")]
    #[case::wrong_geometry("LINESTRING (0 0, 1 1, 2 2)")]
    #[case::empty("")]
    fn rejects_unusable_text(#[case] text: &str) {
        assert_eq!(parse_wkt_polygon(text), None);
    }
}
