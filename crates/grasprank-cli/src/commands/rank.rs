use super::{build_simulator, emit_result, load_batch, progress_reporter};
use crate::cli::RankArgs;
use crate::config::PartialRunConfig;
use crate::error::Result;
use grasprank::workflows;
use tracing::info;

pub fn run(args: RankArgs, quiet: bool) -> Result<()> {
    let partial_config = PartialRunConfig::load(args.batch.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_for_rank(&args)?;

    let batch = load_batch(&args.batch)?;
    let simulator = build_simulator(&batch, &config.simulator);
    let reporter = progress_reporter(quiet);

    info!("Invoking the ranking workflow...");
    let result = workflows::rank::run(
        &batch.hypotheses,
        &batch.layout,
        simulator.as_ref(),
        &batch.object_pose,
        &config.ranking,
        &reporter,
    )?;

    emit_result(&result, &args.batch, config.top)
}
