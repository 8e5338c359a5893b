use crate::core::common::ReservoirLike;
use crate::core::physical_constants::PhysicalConstants;
use crate::errors::SimulationError;

/// A reservoir in thermal equilibrium with its surroundings, held at a fixed
/// temperature above freezing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColdReservoir {
    temperature: f64, // K
}

impl ColdReservoir {
    pub fn new(temperature: f64) -> Result<Self, SimulationError> {
        Self::with_constants(temperature, &PhysicalConstants::default())
    }

    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn with_constants(
        temperature: f64,
        constants: &PhysicalConstants,
    ) -> Result<Self, SimulationError> {
        constants.validate()?;
        if !(temperature > constants.freezing_point) {
            return Err(SimulationError::invalid_parameter(
                "cold reservoir temperature",
                temperature,
                "must be above the freezing point",
            ));
        }

        Ok(Self { temperature })
    }
}

impl ReservoirLike for ColdReservoir {
    fn temperature(&self) -> f64 {
        self.temperature
    }
}
