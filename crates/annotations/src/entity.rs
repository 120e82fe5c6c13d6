use crate::geometry::Geometry;
use crate::style::LayeredStyle;

pub const DEFAULT_LABEL_SIZE_PX: f64 = 28.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub size_px: f64,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size_px: DEFAULT_LABEL_SIZE_PX,
        }
    }

    pub fn with_size(text: impl Into<String>, size_px: f64) -> Self {
        Self {
            text: text.into(),
            size_px,
        }
    }
}

/// Logical, style-aware annotation as the caller sees it.
///
/// The reconciliation engine owns the mapping from `id` to renderer
/// primitives; this value never carries renderer handles.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationEntity {
    pub id: String,
    pub geometry: Geometry,
    pub style: LayeredStyle,
    pub label: Option<Label>,
    pub icon: Option<String>,
}

impl AnnotationEntity {
    pub fn new(id: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            geometry,
            style: LayeredStyle::annotation_default(),
            label: None,
            icon: None,
        }
    }

    pub fn with_style(mut self, style: LayeredStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}
