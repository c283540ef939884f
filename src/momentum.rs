//! This module implements some domain-specific 4-momentum handling logic.
//!
//! Conventions follow those of ROOT's TLorentzVector, which the simulation
//! output was originally produced with: metric is (+, -, -, -), the energy is
//! the last coordinate, and "mass" of a spacelike vector is negative.

use crate::numeric::Float;
use nalgebra::{SVector, Vector3};
use prefix_num_ops::real::*;

/// 4-momentum dimension
pub const MOMENTUM_DIM: usize = 4;

/// Relativistic 4-momentum (MeV)
pub type Momentum = SVector<Float, MOMENTUM_DIM>;

/// Position in the detector frame (mm)
pub type Position = Vector3<Float>;

/// Convenience const for accessing the X coordinate of a 4-vector
pub const X: usize = 0;

/// Convenience const for accessing the Y coordinate of a 4-vector
pub const Y: usize = 1;

/// Convenience const for accessing the Z coordinate of a 4-vector
pub const Z: usize = 2;

/// Convenience const for accessing the E coordinate of a 4-vector
pub const E: usize = 3;

/// Build a 4-momentum from its on-disk (px, py, pz, E) representation
pub fn from_array(p4: [Float; 4]) -> Momentum {
    Momentum::new(p4[X], p4[Y], p4[Z], p4[E])
}

/// Extract the spatial part of a 4-vector
pub fn xyz(m: &Momentum) -> Vector3<Float> {
    Vector3::new(m[X], m[Y], m[Z])
}

/// Extract the spatial part of a 4-position stored as (x, y, z, t)
pub fn position(p4: &[Float; 4]) -> Position {
    Position::new(p4[X], p4[Y], p4[Z])
}

/// Norm of the 3-momentum
pub fn p(m: &Momentum) -> Float {
    xyz(m).norm()
}

/// Invariant mass squared, E² - |p|²
pub fn mag2(m: &Momentum) -> Float {
    m[E] * m[E] - xyz(m).norm_squared()
}

/// Invariant mass, negative for spacelike vectors
pub fn mass(m: &Momentum) -> Float {
    let mm = mag2(m);
    if mm < 0. {
        -sqrt(-mm)
    } else {
        sqrt(mm)
    }
}

/// Kinetic energy, E - M
pub fn kinetic_energy(m: &Momentum) -> Float {
    m[E] - mass(m)
}

/// Lorentz factor 1/√(1 - β²), with β = |p|/E
pub fn gamma(m: &Momentum) -> Float {
    let beta2 = xyz(m).norm_squared() / (m[E] * m[E]);
    1. / sqrt(1. - beta2)
}

/// Angle between two 3-vectors (radians), zero if either of them is null
pub fn angle(a: &Vector3<Float>, b: &Vector3<Float>) -> Float {
    let norms = a.norm() * b.norm();
    if norms <= 0. {
        return 0.;
    }
    let cos = (a.dot(b) / norms).clamp(-1., 1.);
    cos.acos()
}

/// Kinetic energy of a particle of known mass given its 3-momentum norm
pub fn kinetic_energy_from_p(p: Float, mass: Float) -> Float {
    sqrt(p * p + mass * mass) - mass
}
