use crate::core::physical_constants::PhysicalConstants;
use crate::input::{ComponentInput, Input};
use crate::trajectory::StopConditions;
use strum_macros::{Display, EnumIter, EnumString};

/// Reference configurations sharing a 4m2 panel at 20% efficiency, a cold
/// reservoir in equilibrium with the environment at 290K, a pump running at
/// 10 cycles per second and a tank of 1kg of water starting at 300K. They
/// differ only in the work the pump does per cycle.
#[derive(Clone, Copy, Debug, Display, EnumIter, EnumString, Eq, Hash, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum Scenario {
    /// The panel almost always has enough buffered energy for a cycle to move heat.
    Smooth,
    /// The panel must absorb energy for a few cycles before each transfer, but
    /// the run still yields net positive energy.
    Rough,
    /// The pump uses more energy than the panel gathers, so net energy is negative.
    Bad,
}

impl Scenario {
    pub fn pump_energy_per_cycle(&self) -> f64 {
        match self {
            Scenario::Smooth => 4.,
            Scenario::Rough => 100.,
            Scenario::Bad => 200.,
        }
    }

    pub fn input(&self, stop_conditions: StopConditions) -> Input {
        Input {
            physical_constants: PhysicalConstants::default(),
            panel: ComponentInput::SolarPanel {
                area: 4.,
                efficiency: 0.2,
            },
            cold_reservoir: ComponentInput::ColdReservoir { temperature: 290. },
            pump: ComponentInput::Pump {
                energy_per_cycle: self.pump_energy_per_cycle(),
                cycles_per_second: 10.,
            },
            storage: ComponentInput::StorageTank {
                initial_temperature: 300.,
                mass: 1.,
            },
            stop_conditions,
        }
    }
}
