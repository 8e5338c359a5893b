pub mod cold_reservoir;
pub mod common;
pub mod heat_pump;
pub mod physical_constants;
pub mod solar_collector;
pub mod thermal_storage;
pub mod units;
