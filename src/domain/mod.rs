pub mod prediction;
pub mod table;

pub use prediction::*;
pub use table::*;
