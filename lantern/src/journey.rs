//! The move/re-plan loop over a sequence of objectives.

use fogrid_core::{EventSink, Point};
use fogrid_grid::{GridGraph, Terrain};
use fogrid_paths::{PathEngine, SearchError};

use crate::wizard;

/// One objective: a target coordinate plus the unlock offers that become
/// available after it is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Objective {
    pub pos: Point,
    pub offers: Vec<Terrain>,
}

/// A full run: visibility radius, starting coordinate and the ordered
/// objective list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mission {
    pub radius: i32,
    pub start: Point,
    pub objectives: Vec<Objective>,
}

/// Walk every objective of `mission` in order.
///
/// For each objective: consult the wizard first if unlock offers are
/// pending, then alternate search and [`advance`](fogrid_paths::SearchResult::advance)
/// until the objective coordinate is reached, re-planning from wherever a
/// revealed obstacle stopped the walk. Offers listed with an objective are
/// queued once that objective is completed.
///
/// The loop carries no iteration bound; the input must guarantee that every
/// objective stays eventually reachable. A search that currently finds no
/// route logs a warning and re-plans, it does not abort the run.
pub fn run_mission(
    grid: &mut GridGraph,
    mission: &Mission,
    sink: &mut impl EventSink,
) -> Result<(), SearchError> {
    let mut engine = PathEngine::new();
    let mut current = mission.start;
    let mut pending: Vec<Terrain> = Vec::new();

    for (i, objective) in mission.objectives.iter().enumerate() {
        if !pending.is_empty() {
            wizard::choose_best(
                grid,
                &mut engine,
                &mut pending,
                current,
                objective.pos,
                mission.radius,
                sink,
            )?;
        }
        while current != objective.pos {
            let result = engine.search(grid, current, objective.pos, Terrain::OPEN, mission.radius)?;
            if !result.reached() {
                log::warn!(
                    "objective {} at {} is currently unreachable from {current}",
                    i + 1,
                    objective.pos
                );
            }
            current = result.advance(grid, mission.radius, sink).unwrap_or(current);
        }
        sink.emit(&format!("Objective {} reached!", i + 1));
        pending.clone_from(&objective.offers);
    }
    Ok(())
}
