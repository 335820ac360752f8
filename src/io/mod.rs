pub mod schedule;

pub use schedule::{load_schedule, parse_schedule, ScheduleError};
