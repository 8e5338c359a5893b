use crate::core::common::ComponentRole;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("Invalid parameter: {parameter} was {value} but {requirement}")]
    InvalidParameter {
        parameter: &'static str,
        value: f64,
        requirement: &'static str,
    },
    #[error("Component of type {found} cannot act as the {role}")]
    InvalidArgumentType {
        role: ComponentRole,
        found: &'static str,
    },
    #[error(
        "Degenerate state: storage temperature {storage_temperature}K does not exceed cold reservoir temperature {reservoir_temperature}K, so the coefficient of performance is undefined"
    )]
    DegenerateState {
        storage_temperature: f64,
        reservoir_temperature: f64,
    },
}

impl SimulationError {
    pub(crate) fn invalid_parameter(
        parameter: &'static str,
        value: f64,
        requirement: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            parameter,
            value,
            requirement,
        }
    }
}
