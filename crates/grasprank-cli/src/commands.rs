pub mod rank;
pub mod robust;

use crate::cli::BatchArgs;
use crate::config::SimulatorSettings;
use crate::error::Result;
use crate::report;
use crate::utils::progress::CliProgressHandler;
use grasprank::core::io::batch::GraspBatch;
use grasprank::core::simulator::ContactSimulator;
use grasprank::core::simulator::cuboid::CuboidSimulator;
use grasprank::engine::progress::ProgressReporter;
use grasprank::engine::ranking::RankingResult;
use nalgebra::Vector3;
use tracing::{info, warn};

fn load_batch(args: &BatchArgs) -> Result<GraspBatch> {
    info!("Loading grasp batch from {:?}", &args.input);
    let batch = GraspBatch::load(&args.input)?;
    info!(
        hypotheses = batch.hypotheses.len(),
        recordings = batch.recordings.len(),
        width = batch.layout.width(),
        "Batch loaded."
    );
    Ok(batch)
}

fn build_simulator(
    batch: &GraspBatch,
    settings: &SimulatorSettings,
) -> Box<dyn ContactSimulator> {
    match settings {
        SimulatorSettings::Replay => {
            if batch.recordings.is_empty() && !batch.hypotheses.is_empty() {
                warn!("The batch has no recorded contacts; every hypothesis will score zero.");
            }
            Box::new(batch.replay_simulator())
        }
        SimulatorSettings::Cuboid { half_extents, hand } => {
            info!(?half_extents, fingers = hand.fingers, "Using the cuboid contact simulator.");
            Box::new(CuboidSimulator::new(
                batch.layout.clone(),
                Vector3::from(*half_extents),
                *hand,
            ))
        }
    }
}

fn progress_reporter(quiet: bool) -> ProgressReporter<'static> {
    let handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    ProgressReporter::with_callback(handler.get_callback())
}

fn emit_result(result: &RankingResult, args: &BatchArgs, top: usize) -> Result<()> {
    if let Some(path) = &args.output {
        report::write_csv_file(path, result)?;
        info!("Wrote {} ranked candidate(s) to {:?}", result.len(), path);
        println!("Ranking written to: {}", path.display());
    }

    if result.is_empty() {
        println!("The batch contains no hypotheses.");
        return Ok(());
    }
    print!("{}", report::render_summary(result, top));
    Ok(())
}
