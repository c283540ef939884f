//! Basic numerical concepts used throughout the program

#![allow(missing_docs)]

/// Floating-point type used for all physical quantities
pub type Float = f64;
pub use std::f64 as reals;

/// Conversion factor from radians to degrees
pub const RAD_TO_DEG: Float = 180. / reals::consts::PI;

/// Conversion factor from GeV (generator units) to MeV (simulation units)
pub const GEV_TO_MEV: Float = 1000.;

/// Conversion factor from mm (simulation units) to cm
pub const MM_TO_CM: Float = 0.1;
