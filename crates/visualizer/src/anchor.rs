//! Label anchor computation: a representative interior position per
//! geometry kind.

use annotations::Geometry;
use foundation::math::{GeoPos, geo_lerp};

pub fn label_anchor(geometry: &Geometry) -> Option<GeoPos> {
    match geometry {
        Geometry::Point(p) => Some(*p),
        Geometry::LineString(vertices) => line_midpoint(vertices),
        Geometry::Polygon(rings) => ring_centroid(rings.first()?),
        Geometry::MultiPoint(_) | Geometry::MultiLineString(_) | Geometry::MultiPolygon(_) => {
            geometry.bounds().center()
        }
    }
}

/// Midpoint by arc length along the line, not the middle vertex.
fn line_midpoint(vertices: &[GeoPos]) -> Option<GeoPos> {
    if vertices.len() < 2 {
        return vertices.first().copied();
    }

    let mut total = 0.0;
    let mut segments: Vec<(GeoPos, GeoPos, f64)> = Vec::with_capacity(vertices.len() - 1);
    for pair in vertices.windows(2) {
        let a = pair[0];
        let b = pair[1];
        let len = planar_len(a, b);
        if !len.is_finite() || len <= 0.0 {
            continue;
        }
        total += len;
        segments.push((a, b, len));
    }
    if total <= 0.0 {
        return vertices.first().copied();
    }

    let mut acc = 0.0;
    let target = total * 0.5;
    for (a, b, len) in segments {
        if acc + len >= target {
            let t = (target - acc) / len;
            return Some(geo_lerp(a, b, t));
        }
        acc += len;
    }

    vertices.last().copied()
}

fn ring_centroid(ring: &[GeoPos]) -> Option<GeoPos> {
    // Ignore a closing duplicate so it does not double-weight the start.
    let closed = ring.len() >= 2 && ring.first() == ring.last();
    let vertices = if closed { &ring[..ring.len() - 1] } else { ring };

    let mut sum_lon = 0.0;
    let mut sum_lat = 0.0;
    let mut count = 0.0_f64;
    for v in vertices {
        if v.is_finite() {
            sum_lon += v.lon_deg;
            sum_lat += v.lat_deg;
            count += 1.0;
        }
    }
    if count <= 0.0 {
        return None;
    }
    Some(GeoPos::new(sum_lon / count, sum_lat / count, 0.0))
}

fn planar_len(a: GeoPos, b: GeoPos) -> f64 {
    let dx = b.lon_deg - a.lon_deg;
    let dy = b.lat_deg - a.lat_deg;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::label_anchor;
    use annotations::Geometry;
    use foundation::math::GeoPos;

    fn p(lon: f64, lat: f64) -> GeoPos {
        GeoPos::new(lon, lat, 0.0)
    }

    #[test]
    fn point_anchors_on_itself() {
        let anchor = label_anchor(&Geometry::Point(p(3.0, 4.0))).expect("anchor");
        assert_eq!(anchor, p(3.0, 4.0));
    }

    #[test]
    fn line_anchors_at_arc_length_midpoint() {
        // Two segments of length 10 and 30; the midpoint sits inside the
        // second segment, not at the middle vertex.
        let line = Geometry::LineString(vec![p(0.0, 0.0), p(10.0, 0.0), p(40.0, 0.0)]);
        let anchor = label_anchor(&line).expect("anchor");
        assert!((anchor.lon_deg - 20.0).abs() < 1e-9);
        assert_eq!(anchor.lat_deg, 0.0);
    }

    #[test]
    fn polygon_anchor_ignores_closing_duplicate() {
        let ring = vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0), p(0.0, 0.0)];
        let anchor = label_anchor(&Geometry::Polygon(vec![ring])).expect("anchor");
        assert!((anchor.lon_deg - 5.0).abs() < 1e-9);
        assert!((anchor.lat_deg - 5.0).abs() < 1e-9);
    }

    #[test]
    fn multi_part_anchor_is_bounds_center() {
        let geom = Geometry::MultiPoint(vec![p(-10.0, -10.0), p(30.0, 10.0)]);
        let anchor = label_anchor(&geom).expect("anchor");
        assert_eq!(anchor.lon_deg, 10.0);
        assert_eq!(anchor.lat_deg, 0.0);
    }

    #[test]
    fn empty_polygon_has_no_anchor() {
        assert!(label_anchor(&Geometry::Polygon(vec![])).is_none());
    }
}
