//! Lantern — a fog-of-war pathfinding simulator built on fogrid.
//!
//! Loads a terrain grid, weighted edges and an objective sequence from
//! line-oriented text files, then walks the objectives one by one:
//! planning with Dijkstra, stepping along the path, re-planning whenever a
//! hidden obstacle comes into view, and consulting the wizard to unlock the
//! most useful obstacle class when unlock offers are queued.

pub mod journey;
pub mod loader;
pub mod sink;
pub mod wizard;

pub use journey::{Mission, Objective};
pub use sink::FileSink;
