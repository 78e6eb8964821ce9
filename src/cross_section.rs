//! # Neutrino–nucleon cross-section and interaction length
//!
//! Empirical parameterization of the total (charged-current + neutral-current) deep-inelastic
//! cross-section from Connolly, Thorne & Waters (2011), fitted separately for neutrinos and
//! antineutrinos, and the interaction length derived from it.
//!
//! For one interaction channel the fit reads
//!
//! ```text
//! ε = log10(E / GeV)
//! L = ln(ε − c0)
//! log10(σ / cm²) = c1 + c2·L + c3·L² + c4 / L
//! ```
//!
//! and the total cross-section is `σ = σ_cc + σ_nc`. The interaction length is
//! `λ = 1 / (N_A σ)` and the particle-averaged length is the **harmonic** mean of the neutrino
//! and antineutrino lengths, because the physical average is taken over cross-sections.
//!
//! ## Energy domain
//!
//! Energies are in **GeV**, like everywhere else in the crate; the fit is defined on
//! `log10(E / GeV)` and is calibrated between 1e4 and 1e12 GeV. It takes two logarithms, so
//! energies that are not finite, not above 1 GeV, or that drive `ε − c0` to zero or below are
//! rejected with [`NuLimitsError::EnergyOutOfDomain`] instead of producing a NaN.
//!
//! ## See also
//! ------------
//! * [`crate::exposure::effective_area`] – Turns the interaction length into an effective area.
//! * [`CrossSectionModel`] – Switch between the CTW 2011 fit and the Gandhi et al. power law.
use std::str::FromStr;

use serde::Deserialize;

use crate::{
    constants::{GeV, InteractionLength, SquareCentimeter, AVOGADRO},
    nulimits_errors::NuLimitsError,
};

/// Neutrino or antineutrino; selects the coefficient set of the fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleType {
    Neutrino,
    Antineutrino,
}

impl ParticleType {
    pub const ALL: [ParticleType; 2] = [ParticleType::Neutrino, ParticleType::Antineutrino];

    /// Coefficient set of the CTW 2011 fit for this particle.
    pub fn coefficients(&self) -> &'static CrossSectionCoefficients {
        match self {
            ParticleType::Neutrino => &NEUTRINO_CTW2011,
            ParticleType::Antineutrino => &ANTINEUTRINO_CTW2011,
        }
    }
}

impl FromStr for ParticleType {
    type Err = NuLimitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "neutrino" | "nu" => Ok(ParticleType::Neutrino),
            "antineutrino" | "nubar" => Ok(ParticleType::Antineutrino),
            _ => Err(NuLimitsError::InvalidParticleType(s.to_string())),
        }
    }
}

impl std::fmt::Display for ParticleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParticleType::Neutrino => write!(f, "neutrino"),
            ParticleType::Antineutrino => write!(f, "antineutrino"),
        }
    }
}

/// Five fitted coefficients of one interaction channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelCoefficients {
    pub c0: f64,
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub c4: f64,
}

/// Charged- and neutral-current coefficients for one particle type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossSectionCoefficients {
    pub charged_current: ChannelCoefficients,
    pub neutral_current: ChannelCoefficients,
}

pub const NEUTRINO_CTW2011: CrossSectionCoefficients = CrossSectionCoefficients {
    charged_current: ChannelCoefficients {
        c0: -1.826,
        c1: -17.31,
        c2: -6.406,
        c3: 1.431,
        c4: -17.91,
    },
    neutral_current: ChannelCoefficients {
        c0: -1.826,
        c1: -17.31,
        c2: -6.448,
        c3: 1.431,
        c4: -18.61,
    },
};

pub const ANTINEUTRINO_CTW2011: CrossSectionCoefficients = CrossSectionCoefficients {
    charged_current: ChannelCoefficients {
        c0: -1.033,
        c1: -15.95,
        c2: -7.247,
        c3: 1.569,
        c4: -17.72,
    },
    neutral_current: ChannelCoefficients {
        c0: -1.033,
        c1: -15.95,
        c2: -7.296,
        c3: 1.569,
        c4: -18.30,
    },
};

/// Normalization of the Gandhi et al. (1998) power law, cm² at 1 GeV
const GANDHI_SIGMA0: f64 = 7.84e-36;
/// Energy exponent of the Gandhi et al. (1998) power law
const GANDHI_INDEX: f64 = 0.363;

impl ChannelCoefficients {
    /// Cross-section of this channel at `energy`, in cm².
    fn cross_section(&self, energy: GeV) -> Result<SquareCentimeter, NuLimitsError> {
        let eps = energy.log10();
        let arg = eps - self.c0;
        if !(arg > 0.0) {
            return Err(NuLimitsError::EnergyOutOfDomain { energy });
        }
        let log_term = arg.ln();
        let power =
            self.c1 + self.c2 * log_term + self.c3 * log_term.powi(2) + self.c4 / log_term;
        let sigma = 10f64.powf(power);
        if !sigma.is_finite() {
            return Err(NuLimitsError::EnergyOutOfDomain { energy });
        }
        Ok(sigma)
    }
}

fn check_energy(energy: GeV) -> Result<(), NuLimitsError> {
    if energy.is_finite() && energy > 1.0 {
        Ok(())
    } else {
        Err(NuLimitsError::EnergyOutOfDomain { energy })
    }
}

/// Total (CC + NC) neutrino–nucleon cross-section, CTW 2011.
///
/// Arguments
/// -----------------
/// * `energy`: neutrino energy in GeV, must be finite and greater than 1.
/// * `particle_type`: selects the neutrino or antineutrino coefficient set.
///
/// Return
/// ----------
/// * The cross-section in cm², or [`NuLimitsError::EnergyOutOfDomain`].
pub fn total_cross_section(
    energy: GeV,
    particle_type: ParticleType,
) -> Result<SquareCentimeter, NuLimitsError> {
    check_energy(energy)?;
    let coefficients = particle_type.coefficients();
    let sigma_cc = coefficients.charged_current.cross_section(energy)?;
    let sigma_nc = coefficients.neutral_current.cross_section(energy)?;
    Ok(sigma_cc + sigma_nc)
}

/// Interaction length `1 / (N_A σ)` for one particle type.
pub fn interaction_length(
    energy: GeV,
    particle_type: ParticleType,
) -> Result<InteractionLength, NuLimitsError> {
    let sigma = total_cross_section(energy, particle_type)?;
    Ok(1.0 / (AVOGADRO * sigma))
}

/// Harmonic mean of the neutrino and antineutrino interaction lengths.
///
/// The average is taken in cross-section space: `2 / (1/λν + 1/λν̄)`.
pub fn average_interaction_length(energy: GeV) -> Result<InteractionLength, NuLimitsError> {
    let lint_nu = interaction_length(energy, ParticleType::Neutrino)?;
    let lint_nubar = interaction_length(energy, ParticleType::Antineutrino)?;
    Ok(2.0 / ((1.0 / lint_nu) + (1.0 / lint_nubar)))
}

/// Cross-section parameterization used to turn an energy into an interaction length.
///
/// Both the limit and the event-count calculations read the model from the same
/// [`ExposureConfig`](crate::exposure::ExposureConfig), so they always agree on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum CrossSectionModel {
    /// Connolly, Thorne & Waters (2011), particle-averaged
    #[default]
    #[serde(alias = "CTW2011", alias = "ctw2011")]
    Ctw2011,
    /// Gandhi, Quigg, Reno & Sarcevic (1998) high-energy power law
    #[serde(alias = "GANDHI1998", alias = "gandhi1998")]
    Gandhi1998,
}

impl CrossSectionModel {
    /// Total cross-section for one particle type, in cm².
    pub fn total_cross_section(
        &self,
        energy: GeV,
        particle_type: ParticleType,
    ) -> Result<SquareCentimeter, NuLimitsError> {
        match self {
            CrossSectionModel::Ctw2011 => total_cross_section(energy, particle_type),
            CrossSectionModel::Gandhi1998 => {
                check_energy(energy)?;
                Ok(GANDHI_SIGMA0 * energy.powf(GANDHI_INDEX))
            }
        }
    }

    /// Particle-averaged interaction length at `energy` (GeV).
    pub fn average_interaction_length(
        &self,
        energy: GeV,
    ) -> Result<InteractionLength, NuLimitsError> {
        match self {
            CrossSectionModel::Ctw2011 => average_interaction_length(energy),
            CrossSectionModel::Gandhi1998 => {
                // the power law does not distinguish ν from ν̄
                let sigma = self.total_cross_section(energy, ParticleType::Neutrino)?;
                Ok(1.0 / (AVOGADRO * sigma))
            }
        }
    }
}

impl FromStr for CrossSectionModel {
    type Err = NuLimitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ctw2011" | "CTW2011" | "ctw2011" => Ok(CrossSectionModel::Ctw2011),
            "Gandhi1998" | "GANDHI1998" | "gandhi1998" => Ok(CrossSectionModel::Gandhi1998),
            _ => Err(NuLimitsError::UnknownCrossSectionModel(s.to_string())),
        }
    }
}
