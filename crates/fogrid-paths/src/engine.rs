//! Dijkstra search under fog of war, and the movement simulation.

use fogrid_core::{EventSink, Point};
use fogrid_grid::{GridGraph, Terrain};
use thiserror::Error;

use crate::heap::IndexedHeap;

/// Sentinel distance meaning "unreachable".
pub const UNREACHABLE: f32 = f32::INFINITY;

/// Errors from path queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("no node at {0}")]
    NodeNotFound(Point),
}

/// The outcome of one search: the distance to the target and the
/// reconstructed source-to-target path.
///
/// When the target is unreachable the distance is [`UNREACHABLE`] and the
/// path is empty. The result is ephemeral; it borrows nothing and is
/// discarded after the caller steps through it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    pub distance: f32,
    pub path: Vec<Point>,
}

impl SearchResult {
    /// Whether the target was reached.
    pub fn reached(&self) -> bool {
        self.distance.is_finite()
    }

    /// Step along the path, revealing terrain and watching for obstacles.
    ///
    /// At each position the surroundings are revealed within `radius`, then
    /// the remaining path is scanned for a node that is non-open, within
    /// `radius` of the current position, and already revealed. If one is
    /// found a blocked-path notice is emitted and the last safely-reached
    /// position is returned; the caller is expected to re-plan from there.
    /// Otherwise one step is taken and the move is reported to `sink`.
    ///
    /// Returns the final position (the target, or the node where movement
    /// stopped), or `None` if the path is empty.
    pub fn advance(
        &self,
        grid: &mut GridGraph,
        radius: i32,
        sink: &mut impl EventSink,
    ) -> Option<Point> {
        let mut step = 0;
        let mut pos = *self.path.first()?;
        while step + 1 < self.path.len() {
            grid.reveal_within(pos, radius);
            let blocked = self.path[step..].iter().any(|&p| {
                let Some(node) = grid.node(p) else {
                    return false;
                };
                !node.terrain.is_open() && pos.within_radius(p, radius) && node.seen
            });
            if blocked {
                sink.emit("Path is impassable!");
                return Some(pos);
            }
            step += 1;
            pos = self.path[step];
            sink.emit(&format!("Moving to {}-{}", pos.x, pos.y));
        }
        Some(pos)
    }
}

/// Per-search scratch for one node, invalidated lazily by generation stamp.
#[derive(Clone)]
struct SearchNode {
    dist: f32,
    prev: usize,
    generation: u32,
    finalized: bool,
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            dist: UNREACHABLE,
            prev: usize::MAX,
            generation: 0,
            finalized: false,
        }
    }
}

/// Dijkstra search over a [`GridGraph`] with partial visibility.
///
/// Owns a flat per-node scratch table (distance, predecessor, state) keyed
/// by node index. A generation counter is bumped per search so the table
/// never needs an O(n) reset; entries stamped with an older generation read
/// as unvisited. Distances live here, not on the grid, so interleaved
/// trial searches cannot corrupt each other beyond the visibility reveals
/// they intentionally share.
pub struct PathEngine {
    nodes: Vec<SearchNode>,
    generation: u32,
}

impl Default for PathEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PathEngine {
    /// Create an engine. Scratch storage is sized on first use.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generation: 0,
        }
    }

    /// Run Dijkstra from `from` toward `to`.
    ///
    /// `help` is the obstacle class treated as passable for this search in
    /// addition to open terrain (pass [`Terrain::OPEN`] for none); `radius`
    /// is the visibility radius revealed around the source before the
    /// search starts.
    ///
    /// Passability: a node is traversable if its terrain is open or equals
    /// `help`; walls are never traversable; any other obstacle class is
    /// traversable only while it has not yet been revealed. Unknown terrain
    /// is assumed walkable until proven otherwise.
    ///
    /// An unreachable target is not an error: the result carries an
    /// infinite distance and an empty path.
    pub fn search(
        &mut self,
        grid: &mut GridGraph,
        from: Point,
        to: Point,
        help: Terrain,
        radius: i32,
    ) -> Result<SearchResult, SearchError> {
        let src = self.require(grid, from)?;
        let dst = self.require(grid, to)?;

        grid.reveal_within(from, radius);

        if self.nodes.len() < grid.len() {
            self.nodes.resize(grid.len(), SearchNode::default());
        }
        self.generation = self.generation.wrapping_add(1);
        let cur_gen = self.generation;

        {
            let n = &mut self.nodes[src];
            n.dist = 0.0;
            n.prev = usize::MAX;
            n.generation = cur_gen;
            n.finalized = false;
        }
        let mut frontier: IndexedHeap<usize, f32> = IndexedHeap::new();
        frontier.insert(src, 0.0);

        let mut expanded = 0usize;
        while let Ok((ci, cdist)) = frontier.extract_min() {
            if ci == dst {
                let path = self.reconstruct(grid, src, dst, cur_gen);
                log::debug!(
                    "search {from} -> {to}: distance {cdist}, {expanded} nodes expanded"
                );
                return Ok(SearchResult {
                    distance: cdist,
                    path,
                });
            }

            let cn = &mut self.nodes[ci];
            if cn.generation == cur_gen && cn.finalized {
                continue;
            }
            cn.generation = cur_gen;
            cn.finalized = true;

            let Some(cell) = grid.node_at(ci) else {
                continue;
            };
            if !traversable(cell.terrain, cell.seen, help) {
                continue;
            }

            for &(ni, w) in cell.edges() {
                let Some(neighbor) = grid.node_at(ni) else {
                    continue;
                };
                if !traversable(neighbor.terrain, neighbor.seen, help) {
                    continue;
                }
                let tentative = cdist + w;
                let n = &mut self.nodes[ni];
                if n.generation != cur_gen {
                    n.generation = cur_gen;
                    n.dist = UNREACHABLE;
                    n.prev = usize::MAX;
                    n.finalized = false;
                }
                if tentative < n.dist {
                    n.dist = tentative;
                    n.prev = ci;
                    frontier.insert(ni, tentative);
                }
            }
            expanded += 1;
        }

        log::debug!("search {from} -> {to}: unreachable, {expanded} nodes expanded");
        Ok(SearchResult {
            distance: UNREACHABLE,
            path: Vec::new(),
        })
    }

    fn require(&self, grid: &GridGraph, p: Point) -> Result<usize, SearchError> {
        match grid.idx(p) {
            Some(i) if grid.node_at(i).is_some() => Ok(i),
            _ => Err(SearchError::NodeNotFound(p)),
        }
    }

    /// Walk the predecessor chain backward from `dst` and reverse it.
    fn reconstruct(&self, grid: &GridGraph, src: usize, dst: usize, r#gen: u32) -> Vec<Point> {
        let mut path = Vec::new();
        let mut cur = dst;
        loop {
            path.push(grid.point(cur));
            if cur == src {
                break;
            }
            let n = &self.nodes[cur];
            if n.generation != r#gen || n.prev == usize::MAX {
                return Vec::new();
            }
            cur = n.prev;
        }
        path.reverse();
        path
    }
}

/// The fog-of-war passability rule.
fn traversable(terrain: Terrain, seen: bool, help: Terrain) -> bool {
    if terrain.is_open() || terrain == help {
        return true;
    }
    if terrain.is_wall() {
        return false;
    }
    // An unrevealed obstacle class is optimistically assumed walkable.
    !seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use fogrid_core::VecSink;

    /// Build a w x h grid of the given terrain rows, with unit-weight edges
    /// between 4-neighbors.
    fn grid_from_rows(rows: &[&[i32]]) -> GridGraph {
        let h = rows.len() as i32;
        let w = rows[0].len() as i32;
        let mut g = GridGraph::new(w, h);
        for (y, row) in rows.iter().enumerate() {
            for (x, &t) in row.iter().enumerate() {
                g.add_node(Point::new(x as i32, y as i32), Terrain(t))
                    .unwrap();
            }
        }
        for p in g.bounds().iter() {
            for q in [p.shift(1, 0), p.shift(0, 1)] {
                if g.bounds().contains(q) {
                    g.add_edge(p, q, 1.0).unwrap();
                }
            }
        }
        g
    }

    fn assert_edge_connected(g: &GridGraph, path: &[Point]) {
        for pair in path.windows(2) {
            let bi = g.idx(pair[1]).unwrap();
            assert!(
                g.node(pair[0]).unwrap().edges().iter().any(|&(n, _)| n == bi),
                "{} and {} are not connected by an edge",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn uniform_grid_shortest_path() {
        let mut g = grid_from_rows(&[&[0, 0, 0], &[0, 0, 0], &[0, 0, 0]]);
        let mut engine = PathEngine::new();
        let r = engine
            .search(&mut g, Point::ZERO, Point::new(2, 2), Terrain::OPEN, 1)
            .unwrap();
        assert_eq!(r.distance, 4.0);
        assert_eq!(r.path.len(), 5);
        assert_eq!(r.path[0], Point::ZERO);
        assert_eq!(r.path[4], Point::new(2, 2));
        assert_edge_connected(&g, &r.path);
    }

    #[test]
    fn weighted_detour_is_preferred() {
        // Direct east edge costs 10, the detour through (0,1)/(1,1) costs 3.
        let mut g = grid_from_rows(&[&[0, 0], &[0, 0]]);
        g.add_edge(Point::new(0, 0), Point::new(1, 0), 10.0).unwrap();
        let mut engine = PathEngine::new();
        let r = engine
            .search(&mut g, Point::ZERO, Point::new(1, 0), Terrain::OPEN, 1)
            .unwrap();
        assert_eq!(r.distance, 3.0);
        assert_eq!(
            r.path,
            vec![Point::ZERO, Point::new(0, 1), Point::new(1, 1), Point::new(1, 0)]
        );
    }

    #[test]
    fn wall_blocks_the_only_route() {
        let mut g = grid_from_rows(&[&[0, 1, 0]]);
        let mut engine = PathEngine::new();
        let r = engine
            .search(&mut g, Point::ZERO, Point::new(2, 0), Terrain::OPEN, 1)
            .unwrap();
        assert_eq!(r.distance, UNREACHABLE);
        assert!(r.path.is_empty());
        assert!(!r.reached());
    }

    #[test]
    fn unseen_obstacle_is_optimistically_walkable() {
        // The type-3 column is outside the initial reveal radius, so the
        // search routes straight through it.
        let mut g = grid_from_rows(&[&[0, 0, 0, 3, 0]]);
        let mut engine = PathEngine::new();
        let r = engine
            .search(&mut g, Point::ZERO, Point::new(4, 0), Terrain::OPEN, 1)
            .unwrap();
        assert!(r.reached());
        assert_eq!(r.distance, 4.0);
    }

    #[test]
    fn seen_obstacle_blocks() {
        let mut g = grid_from_rows(&[&[0, 0, 3, 0]]);
        g.reveal_within(Point::new(2, 0), 0);
        let mut engine = PathEngine::new();
        let r = engine
            .search(&mut g, Point::ZERO, Point::new(3, 0), Terrain::OPEN, 1)
            .unwrap();
        assert!(!r.reached());
    }

    #[test]
    fn help_type_unlocks_seen_obstacle() {
        let mut g = grid_from_rows(&[&[0, 0, 3, 0]]);
        g.reveal_within(Point::new(2, 0), 0);
        let mut engine = PathEngine::new();
        let r = engine
            .search(&mut g, Point::ZERO, Point::new(3, 0), Terrain(3), 1)
            .unwrap();
        assert!(r.reached());
        assert_eq!(r.distance, 3.0);
    }

    #[test]
    fn source_equals_target() {
        let mut g = grid_from_rows(&[&[0]]);
        let mut engine = PathEngine::new();
        let r = engine
            .search(&mut g, Point::ZERO, Point::ZERO, Terrain::OPEN, 1)
            .unwrap();
        assert_eq!(r.distance, 0.0);
        assert_eq!(r.path, vec![Point::ZERO]);
    }

    #[test]
    fn search_reveals_around_source() {
        let mut g = grid_from_rows(&[&[0, 0, 0]]);
        let mut engine = PathEngine::new();
        engine
            .search(&mut g, Point::ZERO, Point::new(2, 0), Terrain::OPEN, 1)
            .unwrap();
        assert!(g.is_seen(Point::ZERO));
        assert!(g.is_seen(Point::new(1, 0)));
        assert!(!g.is_seen(Point::new(2, 0)));
    }

    #[test]
    fn missing_endpoint_fails_fast() {
        let mut g = GridGraph::new(2, 2);
        g.add_node(Point::ZERO, Terrain::OPEN).unwrap();
        let mut engine = PathEngine::new();
        let missing = Point::new(1, 1);
        assert_eq!(
            engine.search(&mut g, Point::ZERO, missing, Terrain::OPEN, 1),
            Err(SearchError::NodeNotFound(missing))
        );
        let outside = Point::new(5, 5);
        assert_eq!(
            engine.search(&mut g, outside, Point::ZERO, Terrain::OPEN, 1),
            Err(SearchError::NodeNotFound(outside))
        );
    }

    #[test]
    fn repeated_searches_reuse_scratch() {
        let mut g = grid_from_rows(&[&[0, 0, 0], &[0, 0, 0], &[0, 0, 0]]);
        let mut engine = PathEngine::new();
        for _ in 0..3 {
            let r = engine
                .search(&mut g, Point::ZERO, Point::new(2, 2), Terrain::OPEN, 1)
                .unwrap();
            assert_eq!(r.distance, 4.0);
        }
    }

    #[test]
    fn matches_brute_force_on_random_grids() {
        use rand::RngExt;
        let mut rng = rand::rng();
        const W: usize = 5;
        const H: usize = 5;

        for _ in 0..20 {
            let mut g = GridGraph::new(W as i32, H as i32);
            for p in g.bounds().iter() {
                g.add_node(p, Terrain::OPEN).unwrap();
            }
            let mut weights = vec![vec![UNREACHABLE; W * H]; W * H];
            for i in 0..W * H {
                weights[i][i] = 0.0;
            }
            for p in g.bounds().iter() {
                for q in [p.shift(1, 0), p.shift(0, 1)] {
                    if !g.bounds().contains(q) {
                        continue;
                    }
                    let w: f32 = rng.random_range(0.5..3.0);
                    g.add_edge(p, q, w).unwrap();
                    let (pi, qi) = (g.idx(p).unwrap(), g.idx(q).unwrap());
                    weights[pi][qi] = w;
                    weights[qi][pi] = w;
                }
            }
            // Floyd-Warshall reference distances.
            for k in 0..W * H {
                for i in 0..W * H {
                    for j in 0..W * H {
                        let via = weights[i][k] + weights[k][j];
                        if via < weights[i][j] {
                            weights[i][j] = via;
                        }
                    }
                }
            }
            let mut engine = PathEngine::new();
            let from = Point::ZERO;
            let to = Point::new(W as i32 - 1, H as i32 - 1);
            let r = engine
                .search(&mut g, from, to, Terrain::OPEN, 1)
                .unwrap();
            let expected = weights[g.idx(from).unwrap()][g.idx(to).unwrap()];
            assert!(
                (r.distance - expected).abs() < 1e-4,
                "dijkstra {} != floyd-warshall {expected}",
                r.distance
            );
            assert_edge_connected(&g, &r.path);
        }
    }

    // -----------------------------------------------------------------------
    // Movement simulation
    // -----------------------------------------------------------------------

    #[test]
    fn advance_walks_to_target_and_logs_moves() {
        let mut g = grid_from_rows(&[&[0, 0, 0]]);
        let mut engine = PathEngine::new();
        let r = engine
            .search(&mut g, Point::ZERO, Point::new(2, 0), Terrain::OPEN, 1)
            .unwrap();
        let mut sink = VecSink::new();
        let end = r.advance(&mut g, 1, &mut sink);
        assert_eq!(end, Some(Point::new(2, 0)));
        assert_eq!(sink.lines, vec!["Moving to 1-0", "Moving to 2-0"]);
    }

    #[test]
    fn advance_halts_when_obstacle_is_revealed() {
        // The type-2 node at (3,0) is unseen when the path is planned but
        // enters the visibility radius mid-walk.
        let mut g = grid_from_rows(&[&[0, 0, 0, 2, 0]]);
        let mut engine = PathEngine::new();
        let r = engine
            .search(&mut g, Point::ZERO, Point::new(4, 0), Terrain::OPEN, 1)
            .unwrap();
        assert!(r.reached());
        let mut sink = VecSink::new();
        let end = r.advance(&mut g, 1, &mut sink);
        // Stops at (2,0): the reveal from there exposes the obstacle.
        assert_eq!(end, Some(Point::new(2, 0)));
        assert_eq!(
            sink.lines,
            vec!["Moving to 1-0", "Moving to 2-0", "Path is impassable!"]
        );
    }

    #[test]
    fn advance_on_empty_path_is_none() {
        let mut g = grid_from_rows(&[&[0]]);
        let r = SearchResult {
            distance: UNREACHABLE,
            path: Vec::new(),
        };
        let mut sink = VecSink::new();
        assert_eq!(r.advance(&mut g, 1, &mut sink), None);
        assert!(sink.lines.is_empty());
    }

    #[test]
    fn advance_single_node_path_stays_put() {
        let mut g = grid_from_rows(&[&[0]]);
        let r = SearchResult {
            distance: 0.0,
            path: vec![Point::ZERO],
        };
        let mut sink = VecSink::new();
        assert_eq!(r.advance(&mut g, 1, &mut sink), Some(Point::ZERO));
        assert!(sink.lines.is_empty());
    }
}
