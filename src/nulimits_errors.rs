use thiserror::Error;

use crate::constants::GeV;

#[derive(Error, Debug)]
pub enum NuLimitsError {
    #[error("Energy {energy:e} GeV is outside the domain of the cross-section model")]
    EnergyOutOfDomain { energy: GeV },

    #[error("Energies and effective volumes differ in length: {energies} vs {veffs}")]
    LengthMismatch { energies: usize, veffs: usize },

    #[error("Energy grid needs at least 2 points, got {0}")]
    GridTooShort(usize),

    #[error("Energy at index {index} is not a positive finite number: {energy}")]
    NonPositiveEnergy { index: usize, energy: GeV },

    #[error("Energies are not strictly increasing at index {0}")]
    NotIncreasing(usize),

    #[error(
        "Energies should be evenly spaced in log10: gap {index} has step {step}, expected {expected}"
    )]
    NonUniformLogSpacing {
        index: usize,
        step: f64,
        expected: f64,
    },

    #[error("Invalid exposure configuration: {0}")]
    InvalidExposure(String),

    #[error("Invalid particle type: {0}")]
    InvalidParticleType(String),

    #[error("Unknown effective volume dataset: {0}")]
    UnknownDataset(String),

    #[error("Unknown livetime table: {0}")]
    UnknownLivetimeTable(String),

    #[error("Unknown cross-section model: {0}")]
    UnknownCrossSectionModel(String),

    #[error("No exposure recorded for year {0}")]
    UnknownYear(i32),

    #[error("Unable to interpret unit: {0}")]
    InvalidUnit(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid numeric value: {0}")]
    InvalidValue(String),

    #[error("Invalid plot energy power: {0}")]
    InvalidEnergyPower(i32),

    #[error("Error during the nom parsing: {0}")]
    NomParsingError(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl PartialEq for NuLimitsError {
    fn eq(&self, other: &Self) -> bool {
        use NuLimitsError::*;
        match (self, other) {
            (EnergyOutOfDomain { energy: a }, EnergyOutOfDomain { energy: b }) => {
                a.to_bits() == b.to_bits()
            }
            (
                LengthMismatch {
                    energies: a1,
                    veffs: a2,
                },
                LengthMismatch {
                    energies: b1,
                    veffs: b2,
                },
            ) => a1 == b1 && a2 == b2,
            (GridTooShort(a), GridTooShort(b)) => a == b,
            (
                NonPositiveEnergy {
                    index: a,
                    energy: ea,
                },
                NonPositiveEnergy {
                    index: b,
                    energy: eb,
                },
            ) => a == b && ea.to_bits() == eb.to_bits(),
            (NotIncreasing(a), NotIncreasing(b)) => a == b,
            // step values come out of float arithmetic, compare the gap only
            (NonUniformLogSpacing { index: a, .. }, NonUniformLogSpacing { index: b, .. }) => {
                a == b
            }
            (InvalidExposure(a), InvalidExposure(b)) => a == b,
            (InvalidParticleType(a), InvalidParticleType(b)) => a == b,
            (UnknownDataset(a), UnknownDataset(b)) => a == b,
            (UnknownLivetimeTable(a), UnknownLivetimeTable(b)) => a == b,
            (UnknownCrossSectionModel(a), UnknownCrossSectionModel(b)) => a == b,
            (UnknownYear(a), UnknownYear(b)) => a == b,
            (InvalidUnit(a), InvalidUnit(b)) => a == b,
            (MissingColumn(a), MissingColumn(b)) => a == b,
            (InvalidValue(a), InvalidValue(b)) => a == b,
            (InvalidEnergyPower(a), InvalidEnergyPower(b)) => a == b,
            (NomParsingError(a), NomParsingError(b)) => a == b,

            // not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (JsonError(_), JsonError(_)) => true,

            _ => false,
        }
    }
}
