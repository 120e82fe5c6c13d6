use foundation::math::{GeoBounds, GeoPos};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
}

/// Closed tagged union over the supported geometry kinds.
///
/// Coordinate order is (longitude, latitude, altitude) throughout.
/// Matches over this enum are exhaustive on purpose: adding a kind must
/// force every dispatch site to be revisited.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPos),
    MultiPoint(Vec<GeoPos>),
    LineString(Vec<GeoPos>),
    MultiLineString(Vec<Vec<GeoPos>>),
    Polygon(Vec<Vec<GeoPos>>),
    MultiPolygon(Vec<Vec<Vec<GeoPos>>>),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    pub fn is_multi_part(&self) -> bool {
        matches!(
            self,
            Geometry::MultiPoint(_) | Geometry::MultiLineString(_) | Geometry::MultiPolygon(_)
        )
    }

    /// Number of renderer primitives this geometry expands into.
    pub fn part_count(&self) -> usize {
        match self {
            Geometry::Point(_) | Geometry::LineString(_) | Geometry::Polygon(_) => 1,
            Geometry::MultiPoint(ps) => ps.len(),
            Geometry::MultiLineString(lines) => lines.len(),
            Geometry::MultiPolygon(polys) => polys.len(),
        }
    }

    pub fn bounds(&self) -> GeoBounds {
        let mut out = GeoBounds::empty();
        self.for_each_position(&mut |p| out.extend(p));
        out
    }

    fn for_each_position(&self, f: &mut impl FnMut(GeoPos)) {
        match self {
            Geometry::Point(p) => f(*p),
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => {
                for p in ps {
                    f(*p);
                }
            }
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                for line in lines {
                    for p in line {
                        f(*p);
                    }
                }
            }
            Geometry::MultiPolygon(polys) => {
                for poly in polys {
                    for ring in poly {
                        for p in ring {
                            f(*p);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Geometry, GeometryKind};
    use foundation::math::GeoPos;

    fn p(lon: f64, lat: f64) -> GeoPos {
        GeoPos::new(lon, lat, 0.0)
    }

    #[test]
    fn kind_and_part_count() {
        let single = Geometry::LineString(vec![p(0.0, 0.0), p(1.0, 1.0)]);
        assert_eq!(single.kind(), GeometryKind::LineString);
        assert_eq!(single.part_count(), 1);
        assert!(!single.is_multi_part());

        let multi = Geometry::MultiPoint(vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]);
        assert_eq!(multi.part_count(), 3);
        assert!(multi.is_multi_part());
    }

    #[test]
    fn bounds_cover_all_parts() {
        let geom = Geometry::MultiLineString(vec![
            vec![p(-10.0, 0.0), p(0.0, 5.0)],
            vec![p(20.0, -8.0), p(25.0, 3.0)],
        ]);
        let b = geom.bounds();
        assert_eq!(b.min_lon, -10.0);
        assert_eq!(b.max_lon, 25.0);
        assert_eq!(b.min_lat, -8.0);
        assert_eq!(b.max_lat, 5.0);
    }
}
