//! # Accreditation Bodies and Level Vocabularies
//!
//! The Accredo marketplace recognizes three accreditation bodies. EMCC and
//! ICF have automated directory verification; AC is listed for completeness
//! but is verified manually only.
//!
//! Level vocabularies are closed sets: an extracted level label that is not
//! in the body's vocabulary is treated as "no level extracted", never passed
//! through raw.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An accreditation body a coach can claim membership of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccreditationBody {
    /// European Mentoring & Coaching Council. Issues a unique EIA reference
    /// number per accredited individual.
    Emcc,
    /// International Coaching Federation. Named credential levels but no
    /// public per-person reference number.
    Icf,
    /// Association for Coaching. No automated directory verification.
    Ac,
}

impl AccreditationBody {
    /// Canonical uppercase abbreviation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emcc => "EMCC",
            Self::Icf => "ICF",
            Self::Ac => "AC",
        }
    }
}

impl fmt::Display for AccreditationBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccreditationBody {
    type Err = UnknownBody;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EMCC" => Ok(Self::Emcc),
            "ICF" => Ok(Self::Icf),
            "AC" => Ok(Self::Ac),
            _ => Err(UnknownBody {
                value: s.to_string(),
            }),
        }
    }
}

/// Error for an unrecognized accreditation body string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown accreditation body: {value}")]
pub struct UnknownBody {
    /// The unrecognized input.
    pub value: String,
}

/// EMCC EIA award levels, as rendered in the public awards directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmccLevel {
    Foundation,
    Practitioner,
    SeniorPractitioner,
    MasterPractitioner,
    /// Transitional label shown while an award is being reissued.
    Provisional,
}

impl EmccLevel {
    /// All levels the directory is known to render, in ascending order.
    pub const ALL: [EmccLevel; 5] = [
        Self::Foundation,
        Self::Practitioner,
        Self::SeniorPractitioner,
        Self::MasterPractitioner,
        Self::Provisional,
    ];

    /// Label exactly as the EMCC directory renders it.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Foundation => "Foundation",
            Self::Practitioner => "Practitioner",
            Self::SeniorPractitioner => "Senior Practitioner",
            Self::MasterPractitioner => "Master Practitioner",
            Self::Provisional => "Provisional",
        }
    }

    /// Parse a directory label, tolerating case and surrounding whitespace.
    /// Returns `None` for anything outside the known vocabulary.
    pub fn parse_label(raw: &str) -> Option<Self> {
        let folded = raw.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.label().to_ascii_lowercase() == folded)
    }
}

impl fmt::Display for EmccLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// ICF credential levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IcfLevel {
    /// Associate Certified Coach.
    Acc,
    /// Professional Certified Coach.
    Pcc,
    /// Master Certified Coach.
    Mcc,
    /// Advanced Certification in Team Coaching.
    Actc,
}

impl IcfLevel {
    /// Canonical uppercase token as rendered on the ICF directory.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Acc => "ACC",
            Self::Pcc => "PCC",
            Self::Mcc => "MCC",
            Self::Actc => "ACTC",
        }
    }
}

impl fmt::Display for IcfLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IcfLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACC" => Ok(Self::Acc),
            "PCC" => Ok(Self::Pcc),
            "MCC" => Ok(Self::Mcc),
            "ACTC" => Ok(Self::Actc),
            _ => Err(UnknownLevel {
                value: s.to_string(),
            }),
        }
    }
}

/// Error for an unrecognized credential level string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ICF credential level: {value} (expected ACC, PCC, MCC or ACTC)")]
pub struct UnknownLevel {
    /// The unrecognized input.
    pub value: String,
}
