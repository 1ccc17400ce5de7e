#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod retention;
pub mod time;

pub use error::Error;
pub use retention::{ChapterRetention, MasteryLevel, ReviewUrgency, compute_all_chapter_retentions};
pub use time::Clock;
