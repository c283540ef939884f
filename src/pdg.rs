//! Particle Data Group codes and masses used by the analyses

#![allow(missing_docs)]

use crate::numeric::Float;

pub const ELECTRON: i32 = 11;
pub const NU_E: i32 = 12;
pub const MUON: i32 = 13;
pub const NU_MU: i32 = 14;
pub const TAU: i32 = 15;
pub const NU_TAU: i32 = 16;
pub const GAMMA: i32 = 22;
pub const PI_ZERO: i32 = 111;
pub const PI_PLUS: i32 = 211;
pub const K_LONG: i32 = 130;
pub const K_SHORT: i32 = 310;
pub const K_ZERO: i32 = 311;
pub const K_PLUS: i32 = 321;
pub const NEUTRON: i32 = 2112;
pub const PROTON: i32 = 2212;

/// Neutrino flavours, by absolute PDG code
pub const NEUTRINOS: [i32; 3] = [NU_E, NU_MU, NU_TAU];

/// Charged leptons and neutrinos, by absolute PDG code
pub const LEPTONS: [i32; 6] = [ELECTRON, NU_E, MUON, NU_MU, TAU, NU_TAU];

/// Kaon family members which tag an event as strange, by absolute PDG code
pub const KAONS: [i32; 4] = [K_LONG, K_SHORT, K_ZERO, K_PLUS];

/// Proton mass (MeV)
pub const PROTON_MASS: Float = 938.272;

/// Charged pion mass (MeV)
pub const PION_MASS: Float = 139.57;

/// Neutral kaon mass (MeV)
pub const KAON_MASS: Float = 497.61;

/// Truth that a PDG code is a neutrino or antineutrino
pub fn is_neutrino(pdg: i32) -> bool {
    NEUTRINOS.contains(&pdg.abs())
}

/// Truth that a PDG code is a lepton or antilepton
pub fn is_lepton(pdg: i32) -> bool {
    LEPTONS.contains(&pdg.abs())
}

/// Truth that any of the given PDG codes, sign aside, is in `family`
pub fn any_abs_in(pdgs: &[i32], family: &[i32]) -> bool {
    pdgs.iter().any(|pdg| family.contains(&pdg.abs()))
}

/// Human-readable particle name, in Geant4 spelling
///
/// Used when the simulation output did not record one.
pub fn name(pdg: i32) -> &'static str {
    match pdg {
        11 => "e-",
        -11 => "e+",
        12 => "nu_e",
        -12 => "anti_nu_e",
        13 => "mu-",
        -13 => "mu+",
        14 => "nu_mu",
        -14 => "anti_nu_mu",
        15 => "tau-",
        -15 => "tau+",
        16 => "nu_tau",
        -16 => "anti_nu_tau",
        22 => "gamma",
        111 => "pi0",
        211 => "pi+",
        -211 => "pi-",
        130 => "kaon0L",
        310 => "kaon0S",
        311 => "kaon0",
        -311 => "anti_kaon0",
        321 => "kaon+",
        -321 => "kaon-",
        2112 => "neutron",
        -2112 => "anti_neutron",
        2212 => "proton",
        -2212 => "anti_proton",
        3122 => "lambda",
        _ if pdg > 1_000_000_000 => "nucleus",
        _ => "unknown",
    }
}
