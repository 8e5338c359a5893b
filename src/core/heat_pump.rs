use crate::core::common::PumpLike;
use crate::errors::SimulationError;

/// An idealised heat pump that does a fixed amount of work every cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatPump {
    energy_per_cycle: f64,  // J
    cycles_per_second: f64, // Hz
}

impl HeatPump {
    /// Arguments:
    /// * `energy_per_cycle` - work done by the pump each cycle, in J
    /// * `cycles_per_second` - cycle frequency, in Hz
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn new(energy_per_cycle: f64, cycles_per_second: f64) -> Result<Self, SimulationError> {
        if !(energy_per_cycle > 0.) {
            return Err(SimulationError::invalid_parameter(
                "pump energy per cycle",
                energy_per_cycle,
                "must be positive",
            ));
        }
        if !(cycles_per_second > 0.) {
            return Err(SimulationError::invalid_parameter(
                "pump cycles per second",
                cycles_per_second,
                "must be positive",
            ));
        }

        Ok(Self {
            energy_per_cycle,
            cycles_per_second,
        })
    }
}

impl PumpLike for HeatPump {
    fn energy_per_cycle(&self) -> f64 {
        self.energy_per_cycle
    }

    fn cycles_per_second(&self) -> f64 {
        self.cycles_per_second
    }
}
