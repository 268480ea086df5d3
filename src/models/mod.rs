pub mod calendar;
pub mod course;
pub mod lecture;
pub mod slots;
pub mod time;

pub use calendar::*;
pub use course::*;
pub use lecture::*;
pub use slots::*;
pub use time::*;
