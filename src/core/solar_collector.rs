use crate::core::common::PanelLike;
use crate::core::physical_constants::PhysicalConstants;
use crate::errors::SimulationError;

/// This module contains an object that represents a solar panel feeding the
/// cold side of the heat pump.

/// A solar panel of known area and efficiency that keeps a running ledger of
/// absorbed energy.
///
/// The ledger is not floored at zero: callers are expected to only withdraw
/// energy that has already been accumulated.
#[derive(Clone, Debug, PartialEq)]
pub struct SolarCollector {
    area: f64,       // m2
    efficiency: f64, // fraction of incident sunlight absorbed
    solar_constant: f64,
    total_energy_absorbed: f64, // J
}

impl SolarCollector {
    /// Arguments:
    /// * `area` - collecting area of the panel, in m2
    /// * `efficiency` - fraction of incident solar power absorbed, in (0, 1]
    pub fn new(area: f64, efficiency: f64) -> Result<Self, SimulationError> {
        Self::with_constants(area, efficiency, &PhysicalConstants::default())
    }

    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn with_constants(
        area: f64,
        efficiency: f64,
        constants: &PhysicalConstants,
    ) -> Result<Self, SimulationError> {
        constants.validate()?;
        if !(area > 0.) {
            return Err(SimulationError::invalid_parameter(
                "area",
                area,
                "must be positive",
            ));
        }
        if !(efficiency > 0. && efficiency <= 1.) {
            return Err(SimulationError::invalid_parameter(
                "efficiency",
                efficiency,
                "must be greater than 0 and at most 1",
            ));
        }

        Ok(Self {
            area,
            efficiency,
            solar_constant: constants.solar_constant,
            total_energy_absorbed: 0.,
        })
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Absorbed power, in W
    fn power(&self) -> f64 {
        self.solar_constant * self.area * self.efficiency
    }
}

impl PanelLike for SolarCollector {
    fn accumulate(&mut self, elapsed_seconds: f64) {
        self.total_energy_absorbed += self.power() * elapsed_seconds;
    }

    fn withdraw(&mut self, energy: f64) {
        self.total_energy_absorbed -= energy;
    }

    fn total_energy_absorbed(&self) -> f64 {
        self.total_energy_absorbed
    }

    fn time_for_energy(&self, energy: f64) -> f64 {
        energy / self.power()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    pub fn panel() -> SolarCollector {
        SolarCollector::new(4., 0.2).unwrap()
    }

    #[rstest]
    fn should_store_inputs_exactly(panel: SolarCollector) {
        assert_eq!(panel.area(), 4.);
        assert_eq!(panel.efficiency(), 0.2);
        assert_eq!(panel.total_energy_absorbed(), 0.);
    }

    #[rstest]
    #[case(0., 0.2)]
    #[case(-1., 0.2)]
    #[case(4., 0.)]
    #[case(4., -0.1)]
    #[case(4., 1.01)]
    #[case(f64::NAN, 0.2)]
    fn should_reject_out_of_range_parameters(#[case] area: f64, #[case] efficiency: f64) {
        assert!(matches!(
            SolarCollector::new(area, efficiency),
            Err(SimulationError::InvalidParameter { .. })
        ));
    }

    #[rstest]
    fn should_accept_perfect_efficiency() {
        assert!(SolarCollector::new(1., 1.).is_ok());
    }

    #[rstest]
    fn should_accumulate_energy_over_time(mut panel: SolarCollector) {
        panel.accumulate(0.1);
        assert_relative_eq!(panel.total_energy_absorbed(), 109.6, max_relative = 1e-12);
        panel.accumulate(0.9);
        assert_relative_eq!(panel.total_energy_absorbed(), 1096., max_relative = 1e-12);
    }

    #[rstest]
    fn should_withdraw_without_a_floor(mut panel: SolarCollector) {
        panel.accumulate(1.);
        panel.withdraw(1000.);
        assert_relative_eq!(panel.total_energy_absorbed(), 96., max_relative = 1e-12);
        panel.withdraw(200.);
        assert!(panel.total_energy_absorbed() < 0.);
    }

    #[rstest]
    fn should_calc_time_for_energy(panel: SolarCollector) {
        assert_relative_eq!(panel.time_for_energy(1096.), 1., max_relative = 1e-12);
    }

    #[rstest]
    fn should_use_overridden_solar_constant() {
        let constants = PhysicalConstants {
            solar_constant: 1000.,
            ..Default::default()
        };
        let mut panel = SolarCollector::with_constants(1., 0.5, &constants).unwrap();
        panel.accumulate(2.);
        assert_eq!(panel.total_energy_absorbed(), 1000.);
    }

    #[rstest]
    fn should_not_share_ledger_between_instances(mut panel: SolarCollector) {
        let other = SolarCollector::new(4., 0.2).unwrap();
        panel.accumulate(10.);
        assert_eq!(other.total_energy_absorbed(), 0.);
    }
}
