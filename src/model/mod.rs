pub mod calendar;
pub mod controller;
pub mod hover;
pub mod layout;
pub mod relation;
pub mod rows;
pub mod scale;
pub mod schedule;
pub mod ticks;
pub mod window;

pub use controller::{HitTarget, TimelineController, TimelineEvent, TimelineFrame};
pub use layout::{BarLayout, LaidOutBar};
pub use relation::{Highlight, HighlightMode, RelationIndex, SelectionState};
pub use scale::TimeScale;
pub use schedule::{ItemStatus, Resource, Schedule, ScheduleItem};
pub use window::{PanDirection, Preset, TimeWindow};
