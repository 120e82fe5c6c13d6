// Draw crate: pointer-driven annotation authoring on top of a render
// port. The tool owns at most one session at a time.

pub mod events;
pub mod finalize;
pub mod session;
pub mod tessellate;
pub mod tool;

pub use events::*;
pub use finalize::AnnotationFeature;
pub use session::{DrawingSession, RectCorners, SessionAux};
pub use tool::DrawTool;
