//! Data models

pub mod indicator;
pub mod lookup;
pub mod audit;

pub use indicator::*;
pub use lookup::*;
pub use audit::*;
