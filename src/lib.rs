pub mod core;
pub mod engine;
pub mod errors;
pub mod input;
pub mod output;
pub mod scenarios;
pub mod sweep;
pub mod trajectory;

use crate::input::{ingest_for_processing, Input};
use crate::output::Output;
use crate::scenarios::Scenario;
use crate::sweep::run_sweep;
use crate::trajectory::{run_trajectory, StopConditions, Trajectory, TrajectorySummary};
use csv::WriterBuilder;
use indexmap::IndexMap;
use std::io::{Read, Write};
use tracing::{info, instrument};

pub use crate::engine::SimulationEngine;
pub use crate::errors::SimulationError;

/// Run a single project described by JSON input, writing the trajectory and
/// a summary to the given output under the "results" key.
///
/// Stop conditions, when given, override any in the input.
#[instrument(skip_all)]
pub fn run_project(
    input: impl Read,
    output: impl Output,
    stop_conditions: Option<StopConditions>,
) -> Result<TrajectorySummary, anyhow::Error> {
    let mut input = ingest_for_processing(input)?;
    if let Some(stop_conditions) = stop_conditions {
        input.stop_conditions = stop_conditions;
    }

    let mut engine = input.build_engine()?;
    let trajectory = run_trajectory(&mut engine, &input.stop_conditions)?;

    write_results(&output, "results", &trajectory)?;

    Ok(trajectory.summary)
}

/// Run reference scenarios side by side, writing results for each under its name.
#[instrument(skip_all)]
pub fn run_scenarios(
    scenarios: &[Scenario],
    output: impl Output,
    stop_conditions: StopConditions,
) -> Result<IndexMap<String, TrajectorySummary>, anyhow::Error> {
    let inputs: IndexMap<String, Input> = scenarios
        .iter()
        .map(|scenario| (scenario.to_string(), scenario.input(stop_conditions)))
        .collect();

    let mut summaries = IndexMap::with_capacity(inputs.len());
    for (name, result) in run_sweep(&inputs) {
        let trajectory = result?;
        write_results(&output, &name, &trajectory)?;
        summaries.insert(name, trajectory.summary);
    }

    Ok(summaries)
}

fn write_results(
    output: &impl Output,
    output_key: &str,
    trajectory: &Trajectory,
) -> Result<(), anyhow::Error> {
    if output.is_noop() {
        return Ok(());
    }

    info!("writing out to {output_key}");
    write_trajectory_file(output.writer_for_location_key(output_key, "csv")?, trajectory)?;

    let mut writer = output.writer_for_location_key(output_key, "json")?;
    serde_json::to_writer_pretty(&mut writer, &trajectory.summary)?;
    writer.flush()?;

    Ok(())
}

fn write_trajectory_file(writer: impl Write, trajectory: &Trajectory) -> Result<(), anyhow::Error> {
    let mut writer = WriterBuilder::new().from_writer(writer);

    writer.write_record([
        "Cycle",
        "Time",
        "Net energy",
        "Energy in storage",
        "Storage temperature",
        "Phase",
        "Coefficient of performance",
    ])?;
    writer.write_record([
        "[count]",
        "[minutes]",
        "[kJ]",
        "[kJ]",
        "[K]",
        "",
        "[unitless]",
    ])?;

    for observation in &trajectory.observations {
        writer.write_record([
            observation.cycle.to_string(),
            observation.time_minutes.to_string(),
            observation.net_energy_kj.to_string(),
            observation.storage_energy_kj.to_string(),
            observation.storage_temperature.to_string(),
            observation.phase.to_string(),
            observation.coefficient_of_performance.to_string(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
