//! Generator-level (GENIE) truth passed through the detector simulation

use crate::{
    momentum::{self, Momentum},
    numeric::{Float, GEV_TO_MEV},
    pdg,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// GENIE pass-through record of one event (gRooTracker entry)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenieRecord {
    /// Interaction code string
    #[serde(default)]
    pub evt_code: String,

    /// The StdHep particle stack
    #[serde(default)]
    pub particles: Vec<StdHepEntry>,
}

/// One entry of the StdHep particle stack
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StdHepEntry {
    /// GENIE status code, see GenieStatus
    pub status: i32,

    /// PDG code
    pub pdg: i32,

    /// 4-momentum (px, py, pz, E) in GeV
    pub p4: [Float; 4],
}
//
impl StdHepEntry {
    /// Status code as a GENIE enumeration value
    pub fn status(&self) -> GenieStatus {
        GenieStatus::from(self.status)
    }
}

/// Incoming neutrino of an interaction
#[derive(Clone, Debug, PartialEq)]
pub struct Neutrino {
    /// 4-momentum (MeV)
    pub momentum: Momentum,

    /// PDG code
    pub pdg: i32,
}

/// Find the incoming neutrino in the generator record
///
/// This is the first initial-state entry whose PDG code is a neutrino flavour.
/// Its momentum is converted to the MeV units used by the detector simulation.
///
/// Returns None when the stack holds no such entry, which callers must handle.
pub fn find_neutrino(record: &GenieRecord) -> Option<Neutrino> {
    record
        .particles
        .iter()
        .find(|p| p.status() == GenieStatus::InitialState && pdg::is_neutrino(p.pdg))
        .map(|p| Neutrino {
            momentum: momentum::from_array(p.p4) * GEV_TO_MEV,
            pdg: p.pdg,
        })
}

/// GENIE particle status codes (GHepStatus_t)
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenieStatus {
    Undefined,
    InitialState,
    StableFinalState,
    IntermediateState,
    DecayedState,
    CorrelatedNucleon,
    NucleonTarget,
    DisPreFragmHadronicState,
    PreDecayResonantState,
    HadronInTheNucleus,
    FinalStateNuclearRemnant,
    NucleonClusterTarget,
    /// Code outside of the GENIE enumeration
    Other(i32),
}
//
impl From<i32> for GenieStatus {
    fn from(code: i32) -> Self {
        match code {
            -1 => Self::Undefined,
            0 => Self::InitialState,
            1 => Self::StableFinalState,
            2 => Self::IntermediateState,
            3 => Self::DecayedState,
            10 => Self::CorrelatedNucleon,
            11 => Self::NucleonTarget,
            12 => Self::DisPreFragmHadronicState,
            13 => Self::PreDecayResonantState,
            14 => Self::HadronInTheNucleus,
            15 => Self::FinalStateNuclearRemnant,
            16 => Self::NucleonClusterTarget,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for GenieStatus {
    /// Use the names of the GENIE enumeration
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Undefined => "kIStUndefined",
            Self::InitialState => "kIStInitialState",
            Self::StableFinalState => "kIStStableFinalState",
            Self::IntermediateState => "kIStIntermediateState",
            Self::DecayedState => "kIStDecayedState",
            Self::CorrelatedNucleon => "kIStCorrelatedNucleon",
            Self::NucleonTarget => "kIStNucleonTarget",
            Self::DisPreFragmHadronicState => "kIStDISPreFragmHadronicState",
            Self::PreDecayResonantState => "kIStPreDecayResonantState",
            Self::HadronInTheNucleus => "kIStHadronInTheNucleus",
            Self::FinalStateNuclearRemnant => "kIStFinalStateNuclearRemnant",
            Self::NucleonClusterTarget => "kIStNucleonClusterTarget",
            Self::Other(code) => return write!(f, "kIStUnknown({code})"),
        };
        f.write_str(name)
    }
}
