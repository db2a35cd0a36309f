pub mod line;
pub mod pie;
pub mod surface;
pub mod svg;
