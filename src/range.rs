//! Kinetic energy reconstruction from the range of stopping tracks
//!
//! The stopping power table is a quartic fit to the restricted muon energy
//! loss in liquid argon as a function of log10(T), rescaled to the pion mass.

use crate::{event::Trajectory, numeric::Float};

/// Number of Euler steps used to integrate the energy loss along the range
pub const RANGE_STEPS: usize = 100;

/// Kinetic energy the integration starts from, at the stopping point (MeV)
pub const START_KINETIC_ENERGY: Float = 5.;

/// Liquid argon density (g/cm³)
const DENSITY: Float = 1.4;

/// Muon to pion mass ratio used to rescale the muon table
const MASS_SCALE: Float = 105.66 / 139.75;

/// log10(T) at which the fit switches to the high energy coefficients
const LOG_T_SWITCH: Float = 3.0;

/// Fit coefficients below LOG_T_SWITCH, highest power first
const COEFFS_LO: [Float; 5] = [0.363907, -3.99702, 16.8216, -31.8385, 24.2120];

/// Fit coefficients at and above LOG_T_SWITCH, highest power first
const COEFFS_HI: [Float; 5] = [0.120316, -1.64161, 8.36222, -18.4671, 16.3644];

/// Energy loss per unit length (MeV/cm) at kinetic energy `t` (MeV)
pub fn energy_loss_per_cm(t: Float) -> Float {
    let x = (t * MASS_SCALE).log10();
    let coeffs = if x < LOG_T_SWITCH { &COEFFS_LO } else { &COEFFS_HI };
    // Horner evaluation of the quartic
    let dedx = coeffs.iter().fold(0., |acc, &c| acc * x + c);
    DENSITY * dedx
}

/// Kinetic energy (MeV) of a particle which stops after `range` cm
///
/// This walks the track backwards from its stopping point in a fixed number
/// of steps, which is coarse but matches the tolerance of the analyses.
pub fn energy_by_range(range: Float) -> Float {
    let dr = range / RANGE_STEPS as Float;
    (0..RANGE_STEPS).fold(START_KINETIC_ENERGY, |t, _| t + dr * energy_loss_per_cm(t))
}

/// Length of a trajectory (mm), summed over its straight segments
pub fn track_length(trk: &Trajectory) -> Float {
    trk.points
        .windows(2)
        .map(|pair| (pair[1].position() - pair[0].position()).norm())
        .sum()
}
