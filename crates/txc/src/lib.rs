//! Parses TransXChange documents, filters them for freshness, reconstructs
//! their route geometry, assembles deduplicated timetables, and (optionally)
//! expands those timetables into absolute per-stop times.

pub mod expander;
pub mod freshness;
pub mod loader;
pub mod route;
pub mod slug_index;
pub mod stops;
pub mod timetable;
