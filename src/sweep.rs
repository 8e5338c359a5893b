use crate::errors::SimulationError;
use crate::input::Input;
use crate::trajectory::{run_trajectory, Trajectory};
use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{info_span, instrument};

/// Run each named configuration to completion on its own engine.
///
/// Configurations run in parallel; results come back in the order given.
#[instrument(skip_all, fields(configurations = inputs.len()))]
pub fn run_sweep(
    inputs: &IndexMap<String, Input>,
) -> IndexMap<String, Result<Trajectory, SimulationError>> {
    let entries: Vec<(&String, &Input)> = inputs.iter().collect();

    entries
        .into_par_iter()
        .map(|(name, input)| {
            let _span = info_span!("configuration", name = name.as_str()).entered();
            let result = input
                .build_engine()
                .and_then(|mut engine| run_trajectory(&mut engine, &input.stop_conditions));
            (name.clone(), result)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ComponentInput;
    use crate::scenarios::Scenario;
    use crate::trajectory::StopConditions;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use strum::IntoEnumIterator;

    #[fixture]
    pub fn stop_conditions() -> StopConditions {
        StopConditions {
            max_temperature: 500.,
            max_cycles: 1000,
        }
    }

    #[rstest]
    fn should_match_sequential_runs_in_input_order(stop_conditions: StopConditions) {
        let inputs: IndexMap<String, Input> = Scenario::iter()
            .map(|scenario| (scenario.to_string(), scenario.input(stop_conditions)))
            .collect();

        let results = run_sweep(&inputs);

        assert_eq!(
            results.keys().collect::<Vec<_>>(),
            vec!["smooth", "rough", "bad"]
        );
        for (name, input) in &inputs {
            let mut engine = input.build_engine().unwrap();
            let expected = run_trajectory(&mut engine, &input.stop_conditions).unwrap();
            assert_eq!(results[name].as_ref().unwrap(), &expected);
        }
    }

    #[rstest]
    fn should_keep_failures_separate(stop_conditions: StopConditions) {
        let mut broken = Scenario::Smooth.input(stop_conditions);
        broken.pump = ComponentInput::Pump {
            energy_per_cycle: -1.,
            cycles_per_second: 10.,
        };
        let inputs = IndexMap::from([
            ("broken".to_string(), broken),
            ("bad".to_string(), Scenario::Bad.input(stop_conditions)),
        ]);

        let results = run_sweep(&inputs);

        assert!(matches!(
            results["broken"],
            Err(SimulationError::InvalidParameter { .. })
        ));
        assert!(results["bad"].is_ok());
    }
}
