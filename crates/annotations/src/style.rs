use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSize {
    Small,
    Medium,
    Large,
}

/// Partial style specification with simplestyle-flavored keys.
///
/// Every field is optional; a `None` means "not specified here", which
/// matters for the layered merge semantics below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(rename = "stroke-width", default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(
        rename = "stroke-dasharray",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub stroke_dasharray: Option<f64>,
    #[serde(
        rename = "stroke-opacity",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub stroke_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(rename = "fill-opacity", default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(rename = "marker-color", default, skip_serializing_if = "Option::is_none")]
    pub marker_color: Option<String>,
    #[serde(rename = "marker-size", default, skip_serializing_if = "Option::is_none")]
    pub marker_size: Option<MarkerSize>,
}

impl StyleSpec {
    /// Overlays `incoming` on top of `self`, field by field.
    ///
    /// Incoming fields win on conflict; fields absent in both stay unset.
    pub fn overlaid_with(&self, incoming: &StyleSpec) -> StyleSpec {
        StyleSpec {
            stroke: incoming.stroke.clone().or_else(|| self.stroke.clone()),
            stroke_width: incoming.stroke_width.or(self.stroke_width),
            stroke_dasharray: incoming.stroke_dasharray.or(self.stroke_dasharray),
            stroke_opacity: incoming.stroke_opacity.or(self.stroke_opacity),
            fill: incoming.fill.clone().or_else(|| self.fill.clone()),
            fill_opacity: incoming.fill_opacity.or(self.fill_opacity),
            marker_color: incoming
                .marker_color
                .clone()
                .or_else(|| self.marker_color.clone()),
            marker_size: incoming.marker_size.or(self.marker_size),
        }
    }
}

/// Style layers for one entity: the base look, an optional hover look,
/// and an optional per-entity override layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayeredStyle {
    pub initial: StyleSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<StyleSpec>,
    #[serde(
        rename = "perEntityOverrides",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub per_entity: Option<StyleSpec>,
}

impl LayeredStyle {
    pub fn from_initial(initial: StyleSpec) -> Self {
        Self {
            initial,
            hover: None,
            per_entity: None,
        }
    }

    /// Merges `incoming` over this style; incoming fields win per layer.
    pub fn merged_with(&self, incoming: &LayeredStyle) -> LayeredStyle {
        LayeredStyle {
            initial: self.initial.overlaid_with(&incoming.initial),
            hover: overlay_opt(&self.hover, &incoming.hover),
            per_entity: overlay_opt(&self.per_entity, &incoming.per_entity),
        }
    }

    /// Default look for freshly drawn annotations.
    pub fn annotation_default() -> Self {
        Self::from_initial(StyleSpec {
            stroke: Some("#27b2cfe6".to_string()),
            stroke_width: Some(1.0),
            stroke_dasharray: None,
            stroke_opacity: Some(1.0),
            fill: Some("white".to_string()),
            fill_opacity: Some(0.4),
            marker_color: Some("#ffffff".to_string()),
            marker_size: Some(MarkerSize::Medium),
        })
    }
}

fn overlay_opt(base: &Option<StyleSpec>, incoming: &Option<StyleSpec>) -> Option<StyleSpec> {
    match (base, incoming) {
        (Some(b), Some(i)) => Some(b.overlaid_with(i)),
        (Some(b), None) => Some(b.clone()),
        (None, Some(i)) => Some(i.clone()),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{LayeredStyle, MarkerSize, StyleSpec};

    #[test]
    fn incoming_fields_win_other_fields_survive() {
        let base = StyleSpec {
            stroke: Some("blue".to_string()),
            fill: Some("white".to_string()),
            stroke_width: Some(3.0),
            ..StyleSpec::default()
        };
        let incoming = StyleSpec {
            stroke: Some("red".to_string()),
            ..StyleSpec::default()
        };

        let merged = base.overlaid_with(&incoming);
        assert_eq!(merged.stroke.as_deref(), Some("red"));
        assert_eq!(merged.fill.as_deref(), Some("white"));
        assert_eq!(merged.stroke_width, Some(3.0));
        assert_eq!(merged.stroke_opacity, None);
    }

    #[test]
    fn layered_merge_fills_missing_layers() {
        let base = LayeredStyle {
            initial: StyleSpec {
                stroke: Some("blue".to_string()),
                ..StyleSpec::default()
            },
            hover: Some(StyleSpec {
                stroke: Some("yellow".to_string()),
                ..StyleSpec::default()
            }),
            per_entity: None,
        };
        let incoming = LayeredStyle {
            initial: StyleSpec {
                fill: Some("black".to_string()),
                ..StyleSpec::default()
            },
            hover: None,
            per_entity: Some(StyleSpec::default()),
        };

        let merged = base.merged_with(&incoming);
        assert_eq!(merged.initial.stroke.as_deref(), Some("blue"));
        assert_eq!(merged.initial.fill.as_deref(), Some("black"));
        assert_eq!(
            merged.hover.as_ref().and_then(|h| h.stroke.as_deref()),
            Some("yellow")
        );
        assert!(merged.per_entity.is_some());
    }

    #[test]
    fn serde_uses_simplestyle_keys() {
        let spec = StyleSpec {
            stroke_width: Some(2.0),
            marker_size: Some(MarkerSize::Medium),
            ..StyleSpec::default()
        };
        let json = serde_json::to_value(&spec).expect("serialize");
        assert_eq!(json["stroke-width"], 2.0);
        assert_eq!(json["marker-size"], "medium");
        assert!(json.get("stroke").is_none());
    }

    #[test]
    fn override_layer_serializes_as_per_entity_overrides() {
        let style = LayeredStyle {
            initial: StyleSpec::default(),
            hover: None,
            per_entity: Some(StyleSpec {
                stroke: Some("red".to_string()),
                ..StyleSpec::default()
            }),
        };
        let json = serde_json::to_value(&style).expect("serialize");
        assert_eq!(json["perEntityOverrides"]["stroke"], "red");
        assert!(json.get("per-entity").is_none());

        let back: LayeredStyle = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, style);
    }

    #[test]
    fn annotation_default_matches_initial_palette() {
        let style = LayeredStyle::annotation_default();
        assert_eq!(style.initial.stroke.as_deref(), Some("#27b2cfe6"));
        assert_eq!(style.initial.fill_opacity, Some(0.4));
        assert_eq!(style.initial.marker_size, Some(MarkerSize::Medium));
    }
}
