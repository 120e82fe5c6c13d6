use serde::{Deserialize, Serialize};

/// Discriminant selecting which geometry kind a drawing session produces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationMode {
    Point,
    LineString,
    Polygon,
    Rectangle,
    Circle,
    Arrow,
}

pub const ALL_MODES: [AnnotationMode; 6] = [
    AnnotationMode::Point,
    AnnotationMode::LineString,
    AnnotationMode::Polygon,
    AnnotationMode::Rectangle,
    AnnotationMode::Circle,
    AnnotationMode::Arrow,
];

impl AnnotationMode {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Point" => Some(AnnotationMode::Point),
            "LineString" => Some(AnnotationMode::LineString),
            "Polygon" => Some(AnnotationMode::Polygon),
            "Rectangle" => Some(AnnotationMode::Rectangle),
            "Circle" => Some(AnnotationMode::Circle),
            "Arrow" => Some(AnnotationMode::Arrow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationMode::Point => "Point",
            AnnotationMode::LineString => "LineString",
            AnnotationMode::Polygon => "Polygon",
            AnnotationMode::Rectangle => "Rectangle",
            AnnotationMode::Circle => "Circle",
            AnnotationMode::Arrow => "Arrow",
        }
    }
}

/// Capability check against the closed mode set.
pub fn is_drawing_mode_supported(mode: AnnotationMode) -> bool {
    ALL_MODES.contains(&mode)
}
