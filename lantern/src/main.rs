//! Lantern CLI — fog-of-war grid pathfinding simulator.
//!
//! Usage:
//!   lantern <nodes> <edges> <objectives> <output>

use std::path::PathBuf;

use clap::Parser;

use lantern::{FileSink, loader};

#[derive(Parser)]
#[command(name = "lantern", version, about = "Fog-of-war grid pathfinding simulator")]
struct Cli {
    /// Node file: first line "W H", then one "x y type" record per line.
    nodes: PathBuf,
    /// Edge file: one "x1-y1,x2-y2 weight" record per line.
    edges: PathBuf,
    /// Objectives file: radius, start coordinate, then "x y [offer...]".
    objectives: PathBuf,
    /// Output file receiving one progress event per line.
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut grid = loader::load_nodes(&cli.nodes)?;
    loader::load_edges(&cli.edges, &mut grid)?;
    let mission = loader::load_mission(&cli.objectives)?;

    let mut sink = FileSink::create(&cli.output)?;
    lantern::journey::run_mission(&mut grid, &mission, &mut sink)?;
    sink.flush()?;
    Ok(())
}
