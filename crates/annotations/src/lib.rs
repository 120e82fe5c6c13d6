pub mod entity;
pub mod geojson;
pub mod geometry;
pub mod mode;
pub mod style;

pub use entity::*;
pub use geometry::*;
pub use mode::*;
pub use style::*;
