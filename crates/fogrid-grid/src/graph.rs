//! The grid graph: nodes in a flat coordinate-indexed arena.

use std::collections::HashMap;

use fogrid_core::{Bounds, Point};
use thiserror::Error;

use crate::terrain::Terrain;

/// Errors from grid construction and queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("coordinate {0} is outside the grid bounds")]
    OutOfBounds(Point),
    #[error("a node already exists at {0}")]
    Occupied(Point),
    #[error("no node at {0}")]
    NodeNotFound(Point),
}

/// One grid node: terrain tag, visibility flag, and outgoing edges.
///
/// Edges are stored as `(flat neighbor index, weight)` pairs. The visible
/// flag is monotonic: once set it is never cleared.
#[derive(Debug, Clone, Default)]
pub struct NodeCell {
    pub terrain: Terrain,
    pub seen: bool,
    edges: Vec<(usize, f32)>,
}

impl NodeCell {
    /// Outgoing edges as `(flat neighbor index, weight)` pairs.
    pub fn edges(&self) -> &[(usize, f32)] {
        &self.edges
    }
}

/// A fixed-size 2D lattice of typed nodes with weighted edges.
///
/// Built once from external input, then mutated only by visibility reveals
/// and terrain reclassification; never structurally resized. Not every cell
/// needs to hold a node: coordinates absent from the input stay `None`.
#[derive(Debug)]
pub struct GridGraph {
    bounds: Bounds,
    nodes: Vec<Option<NodeCell>>,
    by_type: HashMap<Terrain, Vec<usize>>,
}

impl GridGraph {
    /// Create an empty grid of the given size.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Bounds::new(width, height);
        Self {
            bounds,
            nodes: vec![None; bounds.len()],
            by_type: HashMap::new(),
        }
    }

    /// The grid's bounds.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Number of cells (occupied or not).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the grid has no cells at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a point to a flat index. Returns `None` if out of bounds.
    #[inline]
    pub fn idx(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        Some((p.y as usize) * (self.bounds.width as usize) + p.x as usize)
    }

    /// Convert a flat index back to a point.
    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        let w = self.bounds.width as usize;
        Point::new((idx % w) as i32, (idx / w) as i32)
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Insert a node at `p` with the given terrain.
    ///
    /// Inputs are expected to list each coordinate once; a second insert at
    /// the same coordinate is an error.
    pub fn add_node(&mut self, p: Point, terrain: Terrain) -> Result<(), GridError> {
        let i = self.idx(p).ok_or(GridError::OutOfBounds(p))?;
        if self.nodes[i].is_some() {
            return Err(GridError::Occupied(p));
        }
        self.nodes[i] = Some(NodeCell {
            terrain,
            seen: false,
            edges: Vec::new(),
        });
        self.by_type.entry(terrain).or_default().push(i);
        Ok(())
    }

    /// Add an edge between `a` and `b` in both directions.
    ///
    /// An existing edge between the two nodes is overwritten with the new
    /// weight. Weights must be non-negative; shortest-path correctness
    /// depends on it and negative values are not validated here.
    pub fn add_edge(&mut self, a: Point, b: Point, weight: f32) -> Result<(), GridError> {
        let ai = self.require(a)?;
        let bi = self.require(b)?;
        self.link(ai, bi, weight);
        self.link(bi, ai, weight);
        Ok(())
    }

    fn link(&mut self, from: usize, to: usize, weight: f32) {
        let Some(cell) = self.nodes[from].as_mut() else {
            return;
        };
        match cell.edges.iter_mut().find(|(n, _)| *n == to) {
            Some(entry) => entry.1 = weight,
            None => cell.edges.push((to, weight)),
        }
    }

    fn require(&self, p: Point) -> Result<usize, GridError> {
        let i = self.idx(p).ok_or(GridError::NodeNotFound(p))?;
        if self.nodes[i].is_none() {
            return Err(GridError::NodeNotFound(p));
        }
        Ok(i)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The node at `p`, if any.
    #[inline]
    pub fn node(&self, p: Point) -> Option<&NodeCell> {
        self.nodes[self.idx(p)?].as_ref()
    }

    /// The node at a flat index, if any.
    #[inline]
    pub fn node_at(&self, idx: usize) -> Option<&NodeCell> {
        self.nodes.get(idx)?.as_ref()
    }

    /// Terrain at `p`, if a node exists there.
    #[inline]
    pub fn terrain(&self, p: Point) -> Option<Terrain> {
        self.node(p).map(|n| n.terrain)
    }

    /// Whether the node at `p` has been revealed. `false` for absent nodes.
    #[inline]
    pub fn is_seen(&self, p: Point) -> bool {
        self.node(p).is_some_and(|n| n.seen)
    }

    /// Flat indices of every node currently tagged `t`.
    pub fn nodes_of_type(&self, t: Terrain) -> &[usize] {
        self.by_type.get(&t).map_or(&[], Vec::as_slice)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Mark every node within Euclidean distance `radius` of `center` as
    /// seen.
    ///
    /// Scans the bounding square and filters by squared distance, so the
    /// revealed region is a circle. Monotonic: flags are only ever set.
    pub fn reveal_within(&mut self, center: Point, radius: i32) {
        let r = radius.max(0);
        for y in (center.y - r)..=(center.y + r) {
            for x in (center.x - r)..=(center.x + r) {
                let p = Point::new(x, y);
                if !center.within_radius(p, r) {
                    continue;
                }
                if let Some(i) = self.idx(p) {
                    if let Some(cell) = self.nodes[i].as_mut() {
                        cell.seen = true;
                    }
                }
            }
        }
    }

    /// Retag every node currently of type `from` as `to`.
    ///
    /// Returns the number of nodes reclassified. Used once per unlocked
    /// option, to permanently convert the winning obstacle class to open
    /// terrain.
    pub fn reclassify(&mut self, from: Terrain, to: Terrain) -> usize {
        if from == to {
            return 0;
        }
        let Some(indices) = self.by_type.remove(&from) else {
            return 0;
        };
        let count = indices.len();
        for &i in &indices {
            if let Some(cell) = self.nodes[i].as_mut() {
                cell.terrain = to;
            }
        }
        self.by_type.entry(to).or_default().extend(indices);
        count
    }
}
