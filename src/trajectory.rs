use crate::core::common::{PanelLike, PumpLike, ReservoirLike, StorageLike};
use crate::core::thermal_storage::Phase;
use crate::core::units::{JOULES_PER_KILOJOULE, SECONDS_PER_MINUTE};
use crate::engine::SimulationEngine;
use crate::errors::SimulationError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

#[cfg(feature = "indicatif")]
use indicatif::ProgressIterator;

/// When a driving loop should stop stepping the engine.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StopConditions {
    /// stop once the storage reaches this temperature, in K
    pub max_temperature: f64,
    /// stop after this many cycles
    pub max_cycles: usize,
}

impl Default for StopConditions {
    fn default() -> Self {
        Self {
            max_temperature: 500.,
            max_cycles: 10_000,
        }
    }
}

/// State of a simulation at a cycle boundary, in the units used for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Observation {
    pub cycle: usize,
    pub time_minutes: f64,
    pub net_energy_kj: f64,
    pub storage_energy_kj: f64,
    pub storage_temperature: f64, // K
    pub phase: Phase,
    pub coefficient_of_performance: f64,
}

impl Observation {
    fn capture<P, R, H, S>(engine: &SimulationEngine<P, R, H, S>, cycle: usize) -> Self
    where
        P: PanelLike,
        R: ReservoirLike,
        H: PumpLike,
        S: StorageLike,
    {
        Self {
            cycle,
            time_minutes: cycle as f64
                / engine.pump().cycles_per_second()
                / SECONDS_PER_MINUTE as f64,
            net_energy_kj: engine.net_energy() / JOULES_PER_KILOJOULE as f64,
            storage_energy_kj: engine.storage().energy_level() / JOULES_PER_KILOJOULE as f64,
            storage_temperature: engine.storage().temperature(),
            phase: engine.storage().phase(),
            coefficient_of_performance: engine.coefficient_of_performance(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum StopReason {
    TemperatureReached,
    CycleLimitReached,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrajectorySummary {
    pub cycles_run: usize,
    /// cycles in which the panel had buffered enough energy to move heat
    pub transfer_cycles: usize,
    pub stop_reason: StopReason,
    /// first cycle at which the storage was observed in each phase
    pub phase_entered_at: IndexMap<Phase, usize>,
    pub last: Observation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    pub observations: Vec<Observation>,
    pub summary: TrajectorySummary,
}

/// Step the engine until either stop condition is met, observing it after
/// every cycle.
///
/// The initial state is recorded as cycle 0, and `max_cycles` counts executed
/// cycles, so a run that hits the cycle limit holds `max_cycles + 1`
/// observations. Earlier drivers stopped one cycle short of the limit and
/// produced exactly `max_cycles` observations. The engine is left at the last
/// completed cycle, so it can be inspected or stepped further by the caller.
#[instrument(skip_all, fields(max_temperature = stop.max_temperature, max_cycles = stop.max_cycles))]
pub fn run_trajectory<P, R, H, S>(
    engine: &mut SimulationEngine<P, R, H, S>,
    stop: &StopConditions,
) -> Result<Trajectory, SimulationError>
where
    P: PanelLike,
    R: ReservoirLike,
    H: PumpLike,
    S: StorageLike,
{
    let initial = Observation::capture(engine, 0);
    info!(
        temperature = initial.storage_temperature,
        cop = initial.coefficient_of_performance,
        "starting trajectory"
    );

    let mut observations = vec![initial];
    let mut phase_entered_at = IndexMap::from([(initial.phase, 0)]);
    let mut transfer_cycles = 0;
    let mut cycles_run = 0;

    #[cfg(feature = "indicatif")]
    let cycles = (1..=stop.max_cycles).progress_count(stop.max_cycles as u64);
    #[cfg(not(feature = "indicatif"))]
    let cycles = 1..=stop.max_cycles;

    for cycle in cycles {
        if engine.storage().temperature() >= stop.max_temperature {
            break;
        }

        let report = engine.iterate_cycle()?;
        cycles_run = cycle;
        if report.transfer.is_some() {
            transfer_cycles += 1;
        }

        let observation = Observation::capture(engine, cycle);
        if !phase_entered_at.contains_key(&observation.phase) {
            debug!(cycle, phase = %observation.phase, "storage changed phase");
            phase_entered_at.insert(observation.phase, cycle);
        }
        observations.push(observation);
    }

    let stop_reason = if engine.storage().temperature() >= stop.max_temperature {
        StopReason::TemperatureReached
    } else {
        StopReason::CycleLimitReached
    };

    let last = *observations.last().unwrap_or(&initial);
    info!(
        cycles_run,
        transfer_cycles,
        ?stop_reason,
        temperature = last.storage_temperature,
        net_energy_kj = last.net_energy_kj,
        "trajectory finished"
    );

    Ok(Trajectory {
        observations,
        summary: TrajectorySummary {
            cycles_run,
            transfer_cycles,
            stop_reason,
            phase_entered_at,
            last,
        },
    })
}
