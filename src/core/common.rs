use crate::core::thermal_storage::Phase;
use strum_macros::Display;

/// The roles a component can play in a simulation.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ComponentRole {
    #[strum(to_string = "panel")]
    Panel,
    #[strum(to_string = "cold reservoir")]
    ColdReservoir,
    #[strum(to_string = "pump")]
    Pump,
    #[strum(to_string = "storage")]
    Storage,
}

/// Something that buffers absorbed solar energy and pays it out on request.
pub trait PanelLike {
    fn accumulate(&mut self, elapsed_seconds: f64);
    fn withdraw(&mut self, energy: f64);
    fn total_energy_absorbed(&self) -> f64;
    /// Seconds of collection needed to absorb the given energy
    fn time_for_energy(&self, energy: f64) -> f64;
}

/// A heat source held at constant temperature.
pub trait ReservoirLike {
    fn temperature(&self) -> f64;
}

/// A pump doing a fixed amount of work per cycle at a fixed rate.
pub trait PumpLike {
    fn energy_per_cycle(&self) -> f64;
    fn cycles_per_second(&self) -> f64;

    fn cycle_period(&self) -> f64 {
        1. / self.cycles_per_second()
    }
}

/// A store that warms up as energy is deposited into it.
pub trait StorageLike {
    fn deposit_energy(&mut self, energy: f64);
    fn temperature(&self) -> f64;
    fn energy_level(&self) -> f64;
    fn phase(&self) -> Phase;
}
