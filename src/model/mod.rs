pub mod block;
pub mod board;
pub mod clock;
pub mod dates;
pub mod task;
pub mod timeline;

pub use block::{ChecklistItem, Resource, ScheduleBlock};
pub use board::Board;
pub use clock::{ClockTime, TimeInterval};
pub use dates::DateInterval;
pub use task::{Feature, Task};
pub use timeline::TimelineViewport;
