pub mod mood_entry;
pub mod sheets;

pub use mood_entry::*;
