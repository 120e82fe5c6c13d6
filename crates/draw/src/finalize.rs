//! Turns accumulated session state into a canonical annotation feature.

use annotations::{AnnotationMode, Geometry, StyleSpec};
use foundation::math::GeoPos;
use serde_json::{Value, json};
use uuid::Uuid;
use visualizer::RenderPort;

use crate::session::SessionAux;
use crate::tessellate::tessellate_ellipse;

/// Arrow annotations are rendered with a head hint and never thinner
/// than this, whatever the active style says.
pub const ARROW_MIN_STROKE_WIDTH: f64 = 5.0;

/// A finished annotation: freshly minted id, the mode that produced it,
/// and the style snapshot taken at finalize time.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationFeature {
    pub id: String,
    pub mode: AnnotationMode,
    pub geometry: Geometry,
    pub style: StyleSpec,
}

impl AnnotationFeature {
    /// Single-feature GeoJSON FeatureCollection with
    /// `{id, style, mode}` properties.
    pub fn to_feature_collection(&self) -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {
                    "id": self.id,
                    "mode": self.mode.as_str(),
                    "style": {"initial": self.style},
                },
                "geometry": annotations::geojson::geometry_to_value(&self.geometry),
            }],
        })
    }
}

/// Emits the canonical geometry for `mode`, or `None` when the session
/// holds nothing usable (stray double-click, collapsed rectangle,
/// zero-radius circle). `None` means "keep collecting", not an error.
pub fn finalize(
    port: &dyn RenderPort,
    mode: AnnotationMode,
    committed: &[GeoPos],
    aux: &SessionAux,
    style: &StyleSpec,
) -> Option<AnnotationFeature> {
    let geometry = match mode {
        AnnotationMode::Point => Geometry::Point(*committed.first()?),
        AnnotationMode::LineString => {
            if committed.len() < 2 {
                return None;
            }
            Geometry::LineString(committed.to_vec())
        }
        AnnotationMode::Arrow => {
            if committed.len() < 2 {
                return None;
            }
            Geometry::LineString(committed.to_vec())
        }
        AnnotationMode::Polygon => {
            if committed.len() < 3 {
                return None;
            }
            let mut ring = committed.to_vec();
            // Close with the first vertex, not the last committed one.
            ring.push(committed[0]);
            Geometry::Polygon(vec![ring])
        }
        AnnotationMode::Rectangle => {
            let SessionAux::Rect {
                corners: Some(corners),
                ..
            } = aux
            else {
                return None;
            };
            Geometry::Polygon(vec![corners.ring()])
        }
        AnnotationMode::Circle => {
            let SessionAux::Circle {
                center_px,
                radius_px,
                ..
            } = aux
            else {
                return None;
            };
            let mut ring = tessellate_ellipse(port, *center_px, *radius_px, *radius_px, 0.0);
            if ring.len() < 3 {
                return None;
            }
            ring.push(ring[0]);
            Geometry::Polygon(vec![ring])
        }
    };

    let style = match mode {
        AnnotationMode::Arrow => arrow_style(style),
        _ => style.clone(),
    };

    Some(AnnotationFeature {
        id: Uuid::new_v4().to_string(),
        mode,
        geometry,
        style,
    })
}

fn arrow_style(style: &StyleSpec) -> StyleSpec {
    let mut style = style.clone();
    let width = style.stroke_width.unwrap_or(0.0);
    style.stroke_width = Some(width.max(ARROW_MIN_STROKE_WIDTH));
    style
}
