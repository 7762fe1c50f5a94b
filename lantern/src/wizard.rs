//! Best-option evaluation for obstacle unlocks.

use fogrid_core::{EventSink, Point};
use fogrid_grid::{GridGraph, Terrain};
use fogrid_paths::{IndexedHeap, PathEngine, SearchError};

/// Pick the unlock offer that most shortens the path to `objective` and
/// apply it.
///
/// Runs one full search per candidate with that candidate as the unlocked
/// help type, ranks the resulting distances in a min-heap, and permanently
/// reclassifies the winning obstacle class to open terrain. Ties go to the
/// earlier-listed offer. The offer list is cleared; losing candidates stay
/// impassable.
///
/// Terrain revealed while evaluating a losing candidate is not rolled
/// back: merely weighing an offer scouts the map, and later blockage
/// detection sees that accumulated visibility.
pub fn choose_best(
    grid: &mut GridGraph,
    engine: &mut PathEngine,
    offers: &mut Vec<Terrain>,
    current: Point,
    objective: Point,
    radius: i32,
    sink: &mut impl EventSink,
) -> Result<Option<Terrain>, SearchError> {
    let mut ranked: IndexedHeap<Terrain, f32> = IndexedHeap::new();
    for &offer in offers.iter() {
        let trial = engine.search(grid, current, objective, offer, radius)?;
        log::debug!("offer {offer}: distance {}", trial.distance);
        ranked.insert(offer, trial.distance);
    }
    let Ok((best, _)) = ranked.extract_min() else {
        return Ok(None);
    };
    sink.emit(&format!("Number {best} is chosen!"));
    grid.reclassify(best, Terrain::OPEN);
    offers.clear();
    Ok(Some(best))
}
