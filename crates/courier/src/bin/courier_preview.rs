//! # Courier Preview
//!
//! Generates a world, prints its region map and walks a route from the home
//! region to the farthest corner.
//!
//! ```text
//! courier_preview [world.toml]
//! ```
//!
//! Without a path the built-in defaults are used. Set `RUST_LOG=debug` for
//! per-step planner logs.

use std::process::ExitCode;

use courier::procedural::{GridCoord, WorldGenConfig};
use courier::{CourierResult, WorldSession};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("Preview failed: {}", error);
            ExitCode::FAILURE
        }
    }
}

fn run() -> CourierResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => WorldGenConfig::from_file(path)?,
        None => WorldGenConfig::default(),
    };
    let prefs = config.route;
    let mut session = WorldSession::generate(config)?;
    let size = session.grid().size() as i32;

    println!("Region map ({size}x{size}, '@' marks pinned regions):");
    print!("{}", session.grid().ascii_map());

    let home = session.home().unwrap_or_else(|_| {
        tracing::warn!("No home pin; starting from (0, 0)");
        GridCoord::new(0, 0)
    });
    let destination = farthest_corner(home, size);

    let mut planner = session.planner();
    planner.plan_route(home, destination, &prefs)?;
    println!();
    println!("Route: {}", planner.route_description().unwrap_or_default());

    // Follow the main path; branches are listed but never taken.
    let main_path = planner.graph().map(|graph| graph.main_path().to_vec()).unwrap_or_default();
    for next in main_path.iter().skip(1) {
        println!("  {}", planner.route_status());
        for exit in planner.available_exits() {
            println!("    {:<5} {}", exit.direction, exit.label);
        }
        let Some(exit) = planner.available_exits().into_iter().find(|exit| exit.target == *next) else {
            tracing::warn!("Main path broken at {}", planner.route_status());
            break;
        };
        planner.travel_to_exit(exit.direction, exit.exit_index)?;
    }
    println!("  {}", planner.route_status());
    Ok(())
}

fn farthest_corner(from: GridCoord, size: i32) -> GridCoord {
    let last = size - 1;
    [GridCoord::new(0, 0), GridCoord::new(last, 0), GridCoord::new(0, last), GridCoord::new(last, last)]
        .into_iter()
        .max_by(|a, b| from.distance(*a).total_cmp(&from.distance(*b)))
        .unwrap_or(from)
}
