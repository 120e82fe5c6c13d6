pub mod anchor;
pub mod engine;
pub mod port;
pub mod symbology;

pub use engine::*;
pub use port::*;
