//! Shortest-path search over a partially-observable terrain grid.
//!
//! - [`IndexedHeap`]: a binary min-heap with an auxiliary key-to-slot index
//!   giving O(log n) decrease-key.
//! - [`PathEngine`]: Dijkstra search under the fog-of-war passability rule,
//!   path reconstruction, and the step-by-step movement simulation
//!   ([`SearchResult::advance`]).

mod engine;
mod heap;

pub use engine::{PathEngine, SearchError, SearchResult, UNREACHABLE};
pub use heap::{HeapError, IndexedHeap};
