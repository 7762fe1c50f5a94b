//! The terrain grid graph: a fixed-size 2D lattice of typed nodes with
//! weighted bidirectional edges, monotonic visibility reveals, and bulk
//! type reclassification.

mod graph;
mod terrain;

pub use graph::{GridError, GridGraph, NodeCell};
pub use terrain::Terrain;
