use annotations::AnnotationMode;
use foundation::PrimitiveHandle;
use foundation::math::{GeoPos, Vec2};

/// Projected corners of the live rectangle, fixed winding:
/// north-west, north-east, south-east, south-west.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RectCorners {
    pub nw: GeoPos,
    pub ne: GeoPos,
    pub se: GeoPos,
    pub sw: GeoPos,
}

impl RectCorners {
    pub fn ring(&self) -> Vec<GeoPos> {
        vec![self.nw, self.ne, self.se, self.sw, self.nw]
    }
}

/// Mode-specific scratch state. Consolidated here so a session reset
/// replaces everything at once instead of clearing fields piecemeal.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAux {
    None,
    Rect {
        anchor_px: Vec2,
        corners: Option<RectCorners>,
    },
    Circle {
        center_px: Vec2,
        center_geo: GeoPos,
        radius_px: f64,
    },
}

/// The one active drawing session. `committed` never contains the
/// preview point; the preview is substituted only for feedback shapes.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    pub mode: AnnotationMode,
    pub committed: Vec<GeoPos>,
    pub preview: Option<GeoPos>,
    pub aux: SessionAux,
    pub(crate) anchor_handle: Option<PrimitiveHandle>,
    pub(crate) preview_handle: Option<PrimitiveHandle>,
}

impl DrawingSession {
    pub fn new(mode: AnnotationMode) -> Self {
        Self {
            mode,
            committed: Vec::new(),
            preview: None,
            aux: SessionAux::None,
            anchor_handle: None,
            preview_handle: None,
        }
    }
}
