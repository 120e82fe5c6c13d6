use foundation::math::Vec2;

/// Normalized pointer stream; renderer- and windowing-agnostic.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    Click,
    DoubleClick,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub screen_px: Vec2,
}

impl PointerEvent {
    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Move,
            screen_px: Vec2::new(x, y),
        }
    }

    pub fn click(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Click,
            screen_px: Vec2::new(x, y),
        }
    }

    pub fn double_click(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::DoubleClick,
            screen_px: Vec2::new(x, y),
        }
    }
}
