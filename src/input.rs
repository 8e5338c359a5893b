use crate::core::cold_reservoir::ColdReservoir;
use crate::core::common::ComponentRole;
use crate::core::heat_pump::HeatPump;
use crate::core::physical_constants::PhysicalConstants;
use crate::core::solar_collector::SolarCollector;
use crate::core::thermal_storage::ThermalStorage;
use crate::engine::SimulationEngine;
use crate::errors::SimulationError;
use crate::trajectory::StopConditions;
use serde::Deserialize;
use std::io::{BufReader, Read};
use strum_macros::IntoStaticStr;

pub fn ingest_for_processing(json: impl Read) -> Result<Input, anyhow::Error> {
    Ok(serde_json::from_reader(BufReader::new(json))?)
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Input {
    #[serde(default)]
    pub physical_constants: PhysicalConstants,
    pub panel: ComponentInput,
    pub cold_reservoir: ComponentInput,
    pub pump: ComponentInput,
    pub storage: ComponentInput,
    #[serde(default)]
    pub stop_conditions: StopConditions,
}

/// A component description, tagged with the kind of component it describes.
#[derive(Clone, Debug, Deserialize, IntoStaticStr, PartialEq)]
#[serde(tag = "type", deny_unknown_fields)]
pub enum ComponentInput {
    SolarPanel {
        area: f64,
        efficiency: f64,
    },
    ColdReservoir {
        temperature: f64,
    },
    Pump {
        energy_per_cycle: f64,
        cycles_per_second: f64,
    },
    StorageTank {
        initial_temperature: f64,
        mass: f64,
    },
}

impl ComponentInput {
    fn wrong_type(&self, role: ComponentRole) -> SimulationError {
        SimulationError::InvalidArgumentType {
            role,
            found: self.into(),
        }
    }
}

impl Input {
    fn panel(&self) -> Result<SolarCollector, SimulationError> {
        match self.panel {
            ComponentInput::SolarPanel { area, efficiency } => {
                SolarCollector::with_constants(area, efficiency, &self.physical_constants)
            }
            ref other => Err(other.wrong_type(ComponentRole::Panel)),
        }
    }

    fn cold_reservoir(&self) -> Result<ColdReservoir, SimulationError> {
        match self.cold_reservoir {
            ComponentInput::ColdReservoir { temperature } => {
                ColdReservoir::with_constants(temperature, &self.physical_constants)
            }
            ref other => Err(other.wrong_type(ComponentRole::ColdReservoir)),
        }
    }

    fn pump(&self) -> Result<HeatPump, SimulationError> {
        match self.pump {
            ComponentInput::Pump {
                energy_per_cycle,
                cycles_per_second,
            } => HeatPump::new(energy_per_cycle, cycles_per_second),
            ref other => Err(other.wrong_type(ComponentRole::Pump)),
        }
    }

    fn storage(&self) -> Result<ThermalStorage, SimulationError> {
        match self.storage {
            ComponentInput::StorageTank {
                initial_temperature,
                mass,
            } => ThermalStorage::with_constants(initial_temperature, mass, &self.physical_constants),
            ref other => Err(other.wrong_type(ComponentRole::Storage)),
        }
    }

    /// Build each component in its role and compose them into an engine.
    pub fn build_engine(&self) -> Result<SimulationEngine, SimulationError> {
        SimulationEngine::new(
            self.panel()?,
            self.cold_reservoir()?,
            self.pump()?,
            self.storage()?,
        )
    }
}
