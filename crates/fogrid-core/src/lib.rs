//! Core types shared across the fogrid workspace.
//!
//! - [`Point`] and [`Bounds`]: integer grid geometry.
//! - [`EventSink`]: the append-only line sink through which the engine
//!   reports progress events (moves, blockages, objective completions).

mod geom;
mod sink;

pub use geom::{Bounds, BoundsIter, Point};
pub use sink::{EventSink, VecSink};
