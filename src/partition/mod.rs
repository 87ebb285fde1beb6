//! Street partition: splits the named street network at intersections and
//! traces the enclosed faces, yielding queryable street-bounded cells.

pub mod cells;
pub mod faces;
pub mod noding;

pub use cells::{StreetCell, StreetPartition};
