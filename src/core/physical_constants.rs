use crate::errors::SimulationError;
use serde::Deserialize;

/// This module contains the physical constants used to model water and sunlight.
///
/// Values can be overridden per project in the input file. Each component
/// holds its own copy so no state is shared between simulations.

pub const FREEZING_POINT: f64 = 273.1; // K
pub const BOILING_POINT: f64 = 373.1; // K
pub const SPECIFIC_HEAT_LIQUID: f64 = 4186.; // J/(kg.K)
pub const SPECIFIC_HEAT_GAS: f64 = 1996.; // J/(kg.K)
pub const HEAT_OF_VAPORIZATION: f64 = 2.26e6; // J/kg
pub const SOLAR_CONSTANT: f64 = 1370.; // W/m2

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicalConstants {
    pub freezing_point: f64,
    pub boiling_point: f64,
    pub specific_heat_liquid: f64,
    pub specific_heat_gas: f64,
    pub heat_of_vaporization: f64,
    pub solar_constant: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            freezing_point: FREEZING_POINT,
            boiling_point: BOILING_POINT,
            specific_heat_liquid: SPECIFIC_HEAT_LIQUID,
            specific_heat_gas: SPECIFIC_HEAT_GAS,
            heat_of_vaporization: HEAT_OF_VAPORIZATION,
            solar_constant: SOLAR_CONSTANT,
        }
    }
}

impl PhysicalConstants {
    /// Check the constants describe physically meaningful water and sunlight.
    ///
    /// Negated comparisons reject NaN as well as out-of-range values.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<(), SimulationError> {
        let positive = [
            ("freezing point", self.freezing_point),
            ("specific heat of liquid", self.specific_heat_liquid),
            ("specific heat of gas", self.specific_heat_gas),
            ("heat of vaporization", self.heat_of_vaporization),
            ("solar constant", self.solar_constant),
        ];
        for (parameter, value) in positive {
            if !(value > 0.) || !value.is_finite() {
                return Err(SimulationError::invalid_parameter(
                    parameter,
                    value,
                    "must be positive",
                ));
            }
        }
        if !(self.boiling_point > self.freezing_point) || !self.boiling_point.is_finite() {
            return Err(SimulationError::invalid_parameter(
                "boiling point",
                self.boiling_point,
                "must be above the freezing point",
            ));
        }

        Ok(())
    }

    /// Heat capacity of the given mass of liquid water, in J/K
    pub fn liquid_heat_capacity(&self, mass: f64) -> f64 {
        self.specific_heat_liquid * mass
    }

    /// Heat capacity of the given mass of steam, in J/K
    pub fn gas_heat_capacity(&self, mass: f64) -> f64 {
        self.specific_heat_gas * mass
    }

    /// Energy needed to fully vaporize the given mass of water at the boiling point, in J
    pub fn latent_heat(&self, mass: f64) -> f64 {
        self.heat_of_vaporization * mass
    }
}
