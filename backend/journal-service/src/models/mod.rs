pub mod entry;
pub mod sentiment;

pub use entry::*;
pub use sentiment::*;
