//! Machine schedule timeline: time/pixel geometry, calendar-aligned ticks,
//! row virtualization, bar layout, relation highlighting and the
//! interaction state behind an egui viewer.

pub mod config;
pub mod io;
pub mod model;
