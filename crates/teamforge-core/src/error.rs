//! Error types for the Teamforge composition engine.

use thiserror::Error;

use crate::types::{PersonId, RoleId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Incomplete trait data for person {person}")]
    IncompleteData { person: PersonId },

    #[error("Insufficient candidates for role {role}: need {required}, have {available} (short by {})", shortfall(.required, .available))]
    InsufficientCandidates {
        role: RoleId,
        required: usize,
        available: usize,
    },

    #[error("Trait {trait_name} out of range: {value} not in [{min}, {max}]")]
    InvalidTrait {
        trait_name: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },

    #[error("Invalid trait scale: min {min} must be below max {max}")]
    InvalidScale { min: u8, max: u8 },

    #[error("Person {person} already assigned to the team")]
    DuplicateMember { person: PersonId },

    #[error("Unknown person: {person}")]
    UnknownPerson { person: PersonId },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

fn shortfall(required: &usize, available: &usize) -> usize {
    required.saturating_sub(*available)
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_candidates_names_shortfall() {
        let err = Error::InsufficientCandidates {
            role: RoleId::from("backend"),
            required: 3,
            available: 1,
        };
        let message = err.to_string();
        assert!(message.contains("backend"));
        assert!(message.contains("short by 2"));
    }

    #[test]
    fn test_insufficient_candidates_with_surplus_formats() {
        let err = Error::InsufficientCandidates {
            role: RoleId::from("backend"),
            required: 1,
            available: 4,
        };
        assert!(err.to_string().contains("short by 0"));
    }
}
