use crate::core::cold_reservoir::ColdReservoir;
use crate::core::common::{PanelLike, PumpLike, ReservoirLike, StorageLike};
use crate::core::heat_pump::HeatPump;
use crate::core::solar_collector::SolarCollector;
use crate::core::thermal_storage::ThermalStorage;
use crate::errors::SimulationError;
use tracing::trace;

/// Calculate Carnot CoP based on source and outlet temperatures (in Kelvin)
///
/// Fails rather than returning an infinite or negative CoP when the outlet is
/// not hotter than the source.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub(crate) fn carnot_cop(temp_source: f64, temp_outlet: f64) -> Result<f64, SimulationError> {
    let temp_diff = temp_outlet - temp_source;
    let cop = temp_outlet / temp_diff;
    if !(temp_diff > 0.) || !cop.is_finite() {
        return Err(SimulationError::DegenerateState {
            storage_temperature: temp_outlet,
            reservoir_temperature: temp_source,
        });
    }
    Ok(cop)
}

/// Heat moved during a cycle whose gate opened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatTransfer {
    pub energy_into_storage: f64,        // J
    pub energy_required_from_panel: f64, // J
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CycleReport {
    /// Length of the cycle, in seconds
    pub elapsed: f64,
    /// `None` when the panel had not buffered enough energy for a transfer
    pub transfer: Option<HeatTransfer>,
}

/// Couples a solar panel, a cold reservoir, a heat pump and a storage tank and
/// steps them forward one pump cycle at a time.
///
/// The pump is assumed to always run at the Carnot bound for the current
/// temperatures, so each cycle it delivers `cop * work` to storage and draws
/// `cop * work - work` from the panel's buffered energy. A cycle only moves
/// heat if the panel holds strictly more than that draw; the pump's work is
/// counted against the net energy either way.
#[derive(Clone, Debug)]
pub struct SimulationEngine<
    P = SolarCollector,
    R = ColdReservoir,
    H = HeatPump,
    S = ThermalStorage,
> {
    panel: P,
    cold_reservoir: R,
    pump: H,
    storage: S,
    coefficient_of_performance: f64,
    net_energy: f64, // J
    failure: Option<SimulationError>,
}

impl<P, R, H, S> SimulationEngine<P, R, H, S>
where
    P: PanelLike,
    R: ReservoirLike,
    H: PumpLike,
    S: StorageLike,
{
    pub fn new(panel: P, cold_reservoir: R, pump: H, storage: S) -> Result<Self, SimulationError> {
        let coefficient_of_performance =
            carnot_cop(cold_reservoir.temperature(), storage.temperature())?;

        Ok(Self {
            panel,
            cold_reservoir,
            pump,
            storage,
            coefficient_of_performance,
            net_energy: 0.,
            failure: None,
        })
    }

    /// Run a single pump cycle of length `1 / cycles_per_second`.
    ///
    /// An error means the storage is no longer hotter than the cold reservoir.
    /// The cycle's transfer is still counted in the net energy, but the engine
    /// refuses to run any further cycle and returns the same error instead.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn iterate_cycle(&mut self) -> Result<CycleReport, SimulationError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        let elapsed = self.pump.cycle_period();
        let energy_per_cycle = self.pump.energy_per_cycle();

        self.panel.accumulate(elapsed);
        self.net_energy -= energy_per_cycle;

        let energy_into_storage = self.coefficient_of_performance * energy_per_cycle;
        // first law: heat from the cold side plus the pump's work
        let energy_required_from_panel = energy_into_storage - energy_per_cycle;

        if !(self.panel.total_energy_absorbed() > energy_required_from_panel) {
            trace!(
                energy_required_from_panel,
                total_energy_absorbed = self.panel.total_energy_absorbed(),
                seconds_until_available = self.panel.time_for_energy(
                    energy_required_from_panel - self.panel.total_energy_absorbed()
                ),
                "gate closed, panel has not buffered enough energy"
            );
            return Ok(CycleReport {
                elapsed,
                transfer: None,
            });
        }

        self.panel.withdraw(energy_required_from_panel);
        self.storage.deposit_energy(energy_into_storage);
        self.net_energy += energy_into_storage;
        self.coefficient_of_performance =
            match carnot_cop(self.cold_reservoir.temperature(), self.storage.temperature()) {
                Ok(cop) => cop,
                Err(failure) => {
                    self.failure = Some(failure.clone());
                    return Err(failure);
                }
            };

        trace!(
            energy_into_storage,
            temperature = self.storage.temperature(),
            cop = self.coefficient_of_performance,
            "heat transferred to storage"
        );

        Ok(CycleReport {
            elapsed,
            transfer: Some(HeatTransfer {
                energy_into_storage,
                energy_required_from_panel,
            }),
        })
    }

    /// The error that halted the engine, if any cycle has failed.
    pub fn failure(&self) -> Option<&SimulationError> {
        self.failure.as_ref()
    }

    pub fn coefficient_of_performance(&self) -> f64 {
        self.coefficient_of_performance
    }

    /// Energy stored minus pump work done so far, in J
    pub fn net_energy(&self) -> f64 {
        self.net_energy
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn cold_reservoir(&self) -> &R {
        &self.cold_reservoir
    }

    pub fn pump(&self) -> &H {
        &self.pump
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::thermal_storage::Phase;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn engine_with_pump(energy_per_cycle: f64) -> SimulationEngine {
        SimulationEngine::new(
            SolarCollector::new(4., 0.2).unwrap(),
            ColdReservoir::new(290.).unwrap(),
            HeatPump::new(energy_per_cycle, 10.).unwrap(),
            ThermalStorage::new(300., 1.).unwrap(),
        )
        .unwrap()
    }

    #[fixture]
    pub fn engine() -> SimulationEngine {
        engine_with_pump(4.)
    }

    #[rstest]
    fn should_calc_initial_cop(engine: SimulationEngine) {
        assert_eq!(engine.coefficient_of_performance(), 30.);
        assert_eq!(engine.net_energy(), 0.);
    }

    #[rstest]
    #[case(290.)]
    #[case(285.)]
    fn should_fail_to_build_when_storage_is_not_hotter_than_reservoir(#[case] temperature: f64) {
        let result = SimulationEngine::new(
            SolarCollector::new(4., 0.2).unwrap(),
            ColdReservoir::new(290.).unwrap(),
            HeatPump::new(4., 10.).unwrap(),
            ThermalStorage::new(temperature, 1.).unwrap(),
        );
        assert_eq!(
            result.err(),
            Some(SimulationError::DegenerateState {
                storage_temperature: temperature,
                reservoir_temperature: 290.,
            })
        );
    }

    #[rstest]
    fn should_only_charge_pump_work_when_gate_is_closed(mut engine: SimulationEngine) {
        // one cycle buffers 109.6J but 116J is needed
        let storage_before = engine.storage().clone();
        let cop_before = engine.coefficient_of_performance();

        let report = engine.iterate_cycle().unwrap();

        assert_eq!(report.elapsed, 0.1);
        assert_eq!(report.transfer, None);
        assert_eq!(engine.net_energy(), -4.);
        assert_eq!(
            engine.coefficient_of_performance().to_bits(),
            cop_before.to_bits()
        );
        assert_eq!(engine.storage(), &storage_before);
        assert_relative_eq!(
            engine.panel().total_energy_absorbed(),
            109.6,
            max_relative = 1e-12
        );
    }

    #[rstest]
    fn should_transfer_heat_once_panel_has_buffered_enough(mut engine: SimulationEngine) {
        engine.iterate_cycle().unwrap();
        let report = engine.iterate_cycle().unwrap();

        assert_eq!(
            report.transfer,
            Some(HeatTransfer {
                energy_into_storage: 120.,
                energy_required_from_panel: 116.,
            })
        );
        assert_eq!(engine.net_energy(), -8. + 120.);
        assert_relative_eq!(
            engine.panel().total_energy_absorbed(),
            219.2 - 116.,
            max_relative = 1e-12
        );
        assert_eq!(engine.storage().energy_level(), 120.);
        let temperature = (120. + 4186. * 300.) / 4186.;
        assert_eq!(engine.storage().temperature(), temperature);
        assert_eq!(
            engine.coefficient_of_performance(),
            temperature / (temperature - 290.)
        );
    }

    #[rstest]
    fn should_conserve_energy_on_each_transfer(mut engine: SimulationEngine) {
        for _ in 0..500 {
            let report = engine.iterate_cycle().unwrap();
            if let Some(transfer) = report.transfer {
                assert_relative_eq!(
                    transfer.energy_into_storage,
                    transfer.energy_required_from_panel + engine.pump().energy_per_cycle(),
                    max_relative = 1e-12
                );
            }
        }
    }

    #[rstest]
    fn should_not_increase_cop_as_storage_heats(mut engine: SimulationEngine) {
        let mut previous_cop = engine.coefficient_of_performance();
        let mut previous_temperature = engine.storage().temperature();
        for _ in 0..2000 {
            engine.iterate_cycle().unwrap();
            assert!(engine.storage().temperature() >= previous_temperature);
            assert!(engine.coefficient_of_performance() <= previous_cop);
            previous_cop = engine.coefficient_of_performance();
            previous_temperature = engine.storage().temperature();
        }
        assert!(engine.coefficient_of_performance() < 30.);
        assert_eq!(engine.storage().phase(), Phase::Liquid);
    }

    #[rstest]
    fn should_lose_energy_every_cycle_when_panel_cannot_keep_up() {
        let mut engine = SimulationEngine::new(
            SolarCollector::new(0.001, 0.01).unwrap(),
            ColdReservoir::new(290.).unwrap(),
            HeatPump::new(200., 10.).unwrap(),
            ThermalStorage::new(300., 1.).unwrap(),
        )
        .unwrap();

        let mut previous_net_energy = engine.net_energy();
        for _ in 0..1000 {
            let report = engine.iterate_cycle().unwrap();
            assert_eq!(report.transfer, None);
            assert!(engine.net_energy() < previous_net_energy);
            previous_net_energy = engine.net_energy();
        }
        assert_eq!(engine.net_energy(), -200_000.);
    }

    #[derive(Debug)]
    struct LeakyStorage {
        temperature: f64,
    }

    impl StorageLike for LeakyStorage {
        fn deposit_energy(&mut self, _energy: f64) {
            self.temperature -= 20.;
        }

        fn temperature(&self) -> f64 {
            self.temperature
        }

        fn energy_level(&self) -> f64 {
            0.
        }

        fn phase(&self) -> Phase {
            Phase::Liquid
        }
    }

    #[rstest]
    fn should_fail_loudly_when_storage_drops_to_reservoir_temperature() {
        let mut engine = SimulationEngine::new(
            SolarCollector::new(100., 1.).unwrap(),
            ColdReservoir::new(290.).unwrap(),
            HeatPump::new(1., 10.).unwrap(),
            LeakyStorage { temperature: 300. },
        )
        .unwrap();

        assert_eq!(
            engine.iterate_cycle().err(),
            Some(SimulationError::DegenerateState {
                storage_temperature: 280.,
                reservoir_temperature: 290.,
            })
        );
    }

    #[rstest]
    fn should_refuse_further_cycles_after_degenerate_state() {
        let mut engine = SimulationEngine::new(
            SolarCollector::new(100., 1.).unwrap(),
            ColdReservoir::new(290.).unwrap(),
            HeatPump::new(1., 10.).unwrap(),
            LeakyStorage { temperature: 300. },
        )
        .unwrap();
        let expected = SimulationError::DegenerateState {
            storage_temperature: 280.,
            reservoir_temperature: 290.,
        };

        assert_eq!(engine.iterate_cycle().err(), Some(expected.clone()));
        // the 30J moved by the failing cycle is still accounted for
        assert_eq!(engine.net_energy(), -1. + 30.);
        assert_eq!(engine.failure(), Some(&expected));

        let panel_before = engine.panel().clone();
        for _ in 0..2 {
            assert_eq!(engine.iterate_cycle().err(), Some(expected.clone()));
        }
        assert_eq!(engine.storage().temperature(), 280.);
        assert_eq!(engine.net_energy(), 29.);
        assert_eq!(engine.panel(), &panel_before);
    }

    #[rstest]
    fn should_reject_degenerate_cop() {
        assert!(carnot_cop(290., 290.).is_err());
        assert!(carnot_cop(290., 280.).is_err());
        assert_eq!(carnot_cop(290., 300.).unwrap(), 30.);
    }
}
