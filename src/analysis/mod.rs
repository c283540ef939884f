//! Event selections and the histograms they fill
//!
//! Each analysis provides a per-event kernel which either fills an explicit
//! results accumulator or explains why the event was rejected, plus a driver
//! which runs that kernel over a whole event chain.

pub mod elastic;
pub mod kaon;

use crate::{
    config::Configuration,
    momentum::{self, Momentum},
    numeric::{Float, RAD_TO_DEG},
};
use std::fmt;
use tracing::{debug, info, warn};

/// Reason why an event did not enter an analysis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The event has no interaction vertex
    NoPrimaryVertex,

    /// The primary particles do not match the signal signature
    PrimarySignature,

    /// A track named by the event record is missing from it
    MissingTrack(i32),

    /// The track of interest leaves the active volume
    TrackNotContained,

    /// Visible hadronic activity leaves the active volume
    HadronicLeakage,

    /// No candidate parent for the decay of interest
    NoDecayCandidate,

    /// The decay products do not match the decay of interest
    DecayTopology,
}
//
impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPrimaryVertex => write!(f, "no primary vertex"),
            Self::PrimarySignature => write!(f, "primary particles do not match"),
            Self::MissingTrack(id) => write!(f, "track {id} is missing"),
            Self::TrackNotContained => write!(f, "track not contained"),
            Self::HadronicLeakage => write!(f, "hadronic activity not contained"),
            Self::NoDecayCandidate => write!(f, "no decay candidate"),
            Self::DecayTopology => write!(f, "decay topology does not match"),
        }
    }
}

/// Log the outcome of an event selection
///
/// Malformed events are worth a warning, regular rejections are not.
pub fn report(index: usize, verdict: Result<(), Rejection>) {
    match verdict {
        Ok(()) => debug!("Event {}: selected", index),
        Err(rejection @ (Rejection::NoPrimaryVertex | Rejection::MissingTrack(_))) => {
            warn!("Event {}: skipped, {}", index, rejection)
        }
        Err(rejection) => debug!("Event {}: rejected, {}", index, rejection),
    }
}

/// Angle between a momentum and the beam direction, in degrees
pub fn angle_to_beam(cfg: &Configuration, p: &Momentum) -> Float {
    momentum::angle(&momentum::xyz(p), &cfg.beam_direction) * RAD_TO_DEG
}

/// Periodic progress report over an event loop
#[derive(Clone, Copy, Debug)]
pub struct Progress {
    every: usize,
}
//
impl Progress {
    /// Report `steps` times over `num_events` events, or on every event if
    /// there are fewer events than that
    pub fn new(num_events: usize, steps: usize) -> Self {
        Self {
            every: (num_events / steps.max(1)).max(1),
        }
    }

    /// Report progress if this event index is a reporting point
    pub fn tick(&self, index: usize) {
        if self.is_reporting_point(index) {
            info!("Processed event: {}", index);
        }
    }

    fn is_reporting_point(&self, index: usize) -> bool {
        index % self.every == 0
    }
}
