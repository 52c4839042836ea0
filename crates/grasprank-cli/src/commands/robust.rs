use super::{build_simulator, emit_result, load_batch, progress_reporter};
use crate::cli::RobustArgs;
use crate::config::PartialRunConfig;
use crate::error::Result;
use grasprank::workflows;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

pub fn run(args: RobustArgs, quiet: bool) -> Result<()> {
    let partial_config = PartialRunConfig::load(args.batch.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_for_robust(&args)?;
    if !config.simulator.responds_to_perturbation() {
        warn!(
            "The replay simulator ignores hypothesis values; perturbed samples will reproduce the nominal ranking. Use `[simulator] type = \"cuboid\"` for a robustness estimate."
        );
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(
        seed,
        samples = config.ranking.perturbation.samples,
        "Seeding the perturbation generator."
    );
    let mut rng = StdRng::seed_from_u64(seed);

    let batch = load_batch(&args.batch)?;
    let simulator = build_simulator(&batch, &config.simulator);
    let reporter = progress_reporter(quiet);

    info!("Invoking the robust ranking workflow...");
    let result = workflows::robust::run(
        &batch.hypotheses,
        &batch.layout,
        simulator.as_ref(),
        &batch.object_pose,
        &config.ranking,
        &mut rng,
        &reporter,
    )?;

    println!(
        "Robust ranking over {} perturbed sample(s) per hypothesis (seed {}).",
        config.ranking.perturbation.samples, seed
    );
    emit_result(&result, &args.batch, config.top)
}
