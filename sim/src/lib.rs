pub mod animal;
pub mod biosim;
pub mod cell;
pub mod island;
pub mod map;
pub mod rng;

pub use animal::Animal;
pub use biosim::BioSim;
pub use cell::Cell;
pub use island::Island;
pub use map::IslandMap;

use shared::{Parameters, Result, SimulationReport, SimulationRequest};
use uuid::Uuid;

/// Run a complete island simulation
pub fn run_simulation(request: &SimulationRequest) -> Result<SimulationReport> {
    let mut params = Parameters::default();
    request.overrides.apply(&mut params)?;

    let island = Island::with_parameters(&request.map, params, request.seed)?;
    let mut sim = BioSim::from_island(island, &request.population)?;

    let run_id = Uuid::new_v4();
    tracing::info!(
        "Run {}: simulating {} years from {} animals",
        run_id,
        request.years,
        sim.num_animals()
    );
    sim.simulate(request.years);

    let report = SimulationReport {
        run_id,
        seed: request.seed,
        history: sim.history().to_vec(),
        distribution: sim.animal_distribution(),
    };
    if let Some(last) = report.final_count() {
        tracing::info!(
            "Run {} finished at year {}: {} herbivores, {} carnivores",
            run_id,
            sim.year(),
            last.herbivores,
            last.carnivores
        );
    }
    Ok(report)
}
