/// Geographic position in (longitude, latitude, altitude) order.
///
/// Longitude and latitude are degrees on the WGS84 datum, altitude is
/// meters above the ellipsoid.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPos {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub alt_m: f64,
}

impl GeoPos {
    pub fn new(lon_deg: f64, lat_deg: f64, alt_m: f64) -> Self {
        Self {
            lon_deg,
            lat_deg,
            alt_m,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.lon_deg.is_finite() && self.lat_deg.is_finite() && self.alt_m.is_finite()
    }
}

/// Linear interpolation between two positions; good enough for label
/// anchoring at annotation scales, not for long geodesics.
pub fn geo_lerp(a: GeoPos, b: GeoPos, t: f64) -> GeoPos {
    GeoPos::new(
        a.lon_deg + (b.lon_deg - a.lon_deg) * t,
        a.lat_deg + (b.lat_deg - a.lat_deg) * t,
        a.alt_m + (b.alt_m - a.alt_m) * t,
    )
}

/// Axis-aligned lon/lat bounding box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoBounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    pub fn empty() -> Self {
        Self {
            min_lon: f64::INFINITY,
            min_lat: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
            max_lat: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_lon > self.max_lon || self.min_lat > self.max_lat
    }

    pub fn extend(&mut self, pos: GeoPos) {
        if !pos.is_finite() {
            return;
        }
        self.min_lon = self.min_lon.min(pos.lon_deg);
        self.min_lat = self.min_lat.min(pos.lat_deg);
        self.max_lon = self.max_lon.max(pos.lon_deg);
        self.max_lat = self.max_lat.max(pos.lat_deg);
    }

    pub fn center(&self) -> Option<GeoPos> {
        if self.is_empty() {
            return None;
        }
        Some(GeoPos::new(
            (self.min_lon + self.max_lon) * 0.5,
            (self.min_lat + self.max_lat) * 0.5,
            0.0,
        ))
    }
}
