use crate::core::common::StorageLike;
use crate::core::physical_constants::PhysicalConstants;
use crate::errors::SimulationError;
use serde::Serialize;
use strum_macros::Display;
use tracing::debug;

/// This module contains an object that represents a fixed mass of water in a
/// hot water storage tank that is heated through boiling into steam.

/// Phase of the stored water. Ordering follows the only direction a tank can
/// move in: liquid, then vaporizing, then gas.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Liquid,
    Vaporizing,
    Gas,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ThermalState {
    Liquid {
        heat_capacity: f64, // J/K
    },
    Vaporizing {
        latent_heat_required: f64, // J
        accumulated: f64,          // J
    },
    Gas {
        heat_capacity: f64, // J/K
    },
}

impl ThermalState {
    fn phase(&self) -> Phase {
        match self {
            ThermalState::Liquid { .. } => Phase::Liquid,
            ThermalState::Vaporizing { .. } => Phase::Vaporizing,
            ThermalState::Gas { .. } => Phase::Gas,
        }
    }
}

/// A tank of water whose temperature and phase respond to deposited energy.
///
/// Sensible heating follows `dT = energy / heat_capacity`. When liquid water
/// reaches the boiling point the temperature is pinned there and deposits go
/// towards the latent heat of vaporization until the whole mass has become
/// steam, after which sensible heating resumes with the heat capacity of gas.
///
/// Energy deposited in the call that crosses the boiling point beyond what is
/// needed to reach it, and energy beyond the latent heat in the call that
/// completes vaporization, is not carried into the next phase. This is kept
/// as observed behaviour of the model rather than corrected for conservation;
/// `energy_level` still records every joule deposited.
#[derive(Clone, Debug, PartialEq)]
pub struct ThermalStorage {
    temperature: f64,  // K
    mass: f64,         // kg
    energy_level: f64, // J, cumulative deposits
    state: ThermalState,
    constants: PhysicalConstants,
}

impl ThermalStorage {
    /// Arguments:
    /// * `initial_temperature` - temperature of the water at the start, in K
    /// * `mass` - mass of water in the tank, in kg
    pub fn new(initial_temperature: f64, mass: f64) -> Result<Self, SimulationError> {
        Self::with_constants(initial_temperature, mass, &PhysicalConstants::default())
    }

    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn with_constants(
        initial_temperature: f64,
        mass: f64,
        constants: &PhysicalConstants,
    ) -> Result<Self, SimulationError> {
        constants.validate()?;
        if !(initial_temperature > constants.freezing_point) {
            return Err(SimulationError::invalid_parameter(
                "storage temperature",
                initial_temperature,
                "must be above the freezing point",
            ));
        }
        if !(mass > 0.) {
            return Err(SimulationError::invalid_parameter(
                "storage mass",
                mass,
                "must be positive",
            ));
        }

        let state = if initial_temperature < constants.boiling_point {
            ThermalState::Liquid {
                heat_capacity: constants.liquid_heat_capacity(mass),
            }
        } else if initial_temperature == constants.boiling_point {
            ThermalState::Vaporizing {
                latent_heat_required: constants.latent_heat(mass),
                accumulated: 0.,
            }
        } else {
            ThermalState::Gas {
                heat_capacity: constants.gas_heat_capacity(mass),
            }
        };

        Ok(Self {
            temperature: initial_temperature,
            mass,
            energy_level: 0.,
            state,
            constants: *constants,
        })
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Heat capacity of the water in its current phase.
    ///
    /// For liquid or gas this is in J/K. While vaporizing it is the total
    /// latent heat, in J, needed to complete the phase change.
    pub fn heat_capacity(&self) -> f64 {
        match self.state {
            ThermalState::Liquid { heat_capacity } | ThermalState::Gas { heat_capacity } => {
                heat_capacity
            }
            ThermalState::Vaporizing {
                latent_heat_required,
                ..
            } => latent_heat_required,
        }
    }

    /// Latent heat still to be absorbed, if the water is currently boiling
    pub fn latent_heat_remaining(&self) -> Option<f64> {
        match self.state {
            ThermalState::Vaporizing {
                latent_heat_required,
                accumulated,
            } => Some(latent_heat_required - accumulated),
            _ => None,
        }
    }

    /// Energy absorbed towards vaporization since boiling started; zero outside
    /// the vaporizing phase.
    pub fn vapor_heat_accumulated(&self) -> f64 {
        match self.state {
            ThermalState::Vaporizing { accumulated, .. } => accumulated,
            _ => 0.,
        }
    }

    fn begin_vaporizing(&mut self) {
        self.temperature = self.constants.boiling_point;
        self.state = ThermalState::Vaporizing {
            latent_heat_required: self.constants.latent_heat(self.mass),
            accumulated: 0.,
        };
        debug!(
            energy_level = self.energy_level,
            "storage reached boiling point, now vaporizing"
        );
    }

    fn finish_vaporizing(&mut self) {
        self.state = ThermalState::Gas {
            heat_capacity: self.constants.gas_heat_capacity(self.mass),
        };
        debug!(
            energy_level = self.energy_level,
            "storage fully vaporized, now gas"
        );
    }
}

impl StorageLike for ThermalStorage {
    fn deposit_energy(&mut self, energy: f64) {
        self.energy_level += energy;

        match self.state {
            ThermalState::Liquid { heat_capacity } => {
                self.temperature = (energy + heat_capacity * self.temperature) / heat_capacity;
                if self.temperature >= self.constants.boiling_point {
                    self.begin_vaporizing();
                }
            }
            ThermalState::Gas { heat_capacity } => {
                self.temperature = (energy + heat_capacity * self.temperature) / heat_capacity;
            }
            ThermalState::Vaporizing {
                latent_heat_required,
                accumulated,
            } => {
                let accumulated = accumulated + energy;
                if accumulated >= latent_heat_required {
                    self.finish_vaporizing();
                } else {
                    self.state = ThermalState::Vaporizing {
                        latent_heat_required,
                        accumulated,
                    };
                }
            }
        }
    }

    fn temperature(&self) -> f64 {
        self.temperature
    }

    fn energy_level(&self) -> f64 {
        self.energy_level
    }

    fn phase(&self) -> Phase {
        self.state.phase()
    }
}
