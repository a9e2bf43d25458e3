// fairy-core/src/ports/mod.rs

pub mod clock;
pub mod table_source;

pub use clock::{Clock, FixedClock, SystemClock};
pub use table_source::{LoadOptions, TableSource};
