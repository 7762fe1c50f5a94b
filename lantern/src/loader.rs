//! Loaders for the line-oriented input formats.
//!
//! Three files describe a run:
//! - nodes: first line `W H`, then one `x y type` record per line;
//! - edges: one `x1-y1,x2-y2 weight` record per line;
//! - objectives: the visibility radius, the start coordinate, then one
//!   `x y [offer...]` record per objective.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use fogrid_core::Point;
use fogrid_grid::{GridError, GridGraph, Terrain};
use thiserror::Error;

use crate::journey::{Mission, Objective};

/// Errors from reading and parsing the input files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl LoadError {
    fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

/// Read the node file at `path` into a freshly-built grid.
pub fn load_nodes(path: impl AsRef<Path>) -> Result<GridGraph, LoadError> {
    parse_nodes(BufReader::new(File::open(path)?))
}

/// Read the edge file at `path` into an existing grid.
pub fn load_edges(path: impl AsRef<Path>, grid: &mut GridGraph) -> Result<(), LoadError> {
    parse_edges(BufReader::new(File::open(path)?), grid)
}

/// Read the objectives file at `path`.
pub fn load_mission(path: impl AsRef<Path>) -> Result<Mission, LoadError> {
    parse_mission(BufReader::new(File::open(path)?))
}

/// Parse the node format: `W H`, then `x y type` per line.
pub fn parse_nodes(reader: impl BufRead) -> Result<GridGraph, LoadError> {
    let mut lines = numbered_lines(reader);

    let (n, header) = lines
        .next()
        .transpose()?
        .ok_or_else(|| LoadError::malformed(1, "missing grid size header"))?;
    let mut toks = header.split_whitespace();
    let width = field(&mut toks, n, "grid width")?;
    let height = field(&mut toks, n, "grid height")?;
    let mut grid = GridGraph::new(width, height);

    for item in lines {
        let (n, line) = item?;
        if line.trim().is_empty() {
            continue;
        }
        let mut toks = line.split_whitespace();
        let x = field(&mut toks, n, "node x")?;
        let y = field(&mut toks, n, "node y")?;
        let terrain: Terrain = field(&mut toks, n, "node type")?;
        grid.add_node(Point::new(x, y), terrain)?;
    }
    log::debug!("loaded a {} grid", grid.bounds());
    Ok(grid)
}

/// Parse the edge format: `x1-y1,x2-y2 weight` per line.
pub fn parse_edges(reader: impl BufRead, grid: &mut GridGraph) -> Result<(), LoadError> {
    for item in numbered_lines(reader) {
        let (n, line) = item?;
        if line.trim().is_empty() {
            continue;
        }
        let mut toks = line.split_whitespace();
        let pair = toks
            .next()
            .ok_or_else(|| LoadError::malformed(n, "missing edge endpoints"))?;
        let weight: f32 = field(&mut toks, n, "edge weight")?;
        let (a, b) = pair
            .split_once(',')
            .ok_or_else(|| LoadError::malformed(n, "expected two comma-separated endpoints"))?;
        grid.add_edge(parse_coord(a, n)?, parse_coord(b, n)?, weight)?;
    }
    Ok(())
}

/// Parse the objectives format: radius, start, then `x y [offer...]`.
pub fn parse_mission(reader: impl BufRead) -> Result<Mission, LoadError> {
    let mut lines = numbered_lines(reader);

    let (n, first) = lines
        .next()
        .transpose()?
        .ok_or_else(|| LoadError::malformed(1, "missing visibility radius"))?;
    let radius = field(&mut first.split_whitespace(), n, "visibility radius")?;

    let (n, second) = lines
        .next()
        .transpose()?
        .ok_or_else(|| LoadError::malformed(2, "missing start coordinate"))?;
    let mut toks = second.split_whitespace();
    let sx = field(&mut toks, n, "start x")?;
    let sy = field(&mut toks, n, "start y")?;

    let mut objectives = Vec::new();
    for item in lines {
        let (n, line) = item?;
        if line.trim().is_empty() {
            continue;
        }
        let mut toks = line.split_whitespace();
        let x = field(&mut toks, n, "objective x")?;
        let y = field(&mut toks, n, "objective y")?;
        let offers = toks
            .map(|t| {
                t.parse::<Terrain>()
                    .map_err(|_| LoadError::malformed(n, format!("bad offer tag {t:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        objectives.push(Objective {
            pos: Point::new(x, y),
            offers,
        });
    }

    Ok(Mission {
        radius,
        start: Point::new(sx, sy),
        objectives,
    })
}

/// Iterate lines paired with their 1-based line number.
fn numbered_lines(reader: impl BufRead) -> impl Iterator<Item = Result<(usize, String), LoadError>> {
    reader
        .lines()
        .enumerate()
        .map(|(i, line)| Ok((i + 1, line?)))
}

/// Pull and parse the next whitespace token of a line.
fn field<'a, T: FromStr>(
    toks: &mut impl Iterator<Item = &'a str>,
    line: usize,
    what: &str,
) -> Result<T, LoadError> {
    let tok = toks
        .next()
        .ok_or_else(|| LoadError::malformed(line, format!("missing {what}")))?;
    tok.parse()
        .map_err(|_| LoadError::malformed(line, format!("bad {what} {tok:?}")))
}

/// Parse an `x-y` coordinate token.
fn parse_coord(tok: &str, line: usize) -> Result<Point, LoadError> {
    let parse = || {
        let (x, y) = tok.split_once('-')?;
        Some(Point::new(x.parse().ok()?, y.parse().ok()?))
    };
    parse().ok_or_else(|| LoadError::malformed(line, format!("bad coordinate {tok:?}")))
}
