//! This module defines the properties and storage of simulated detector events
//!
//! These mirror the edep-sim TG4Event hierarchy: primary vertices holding the
//! particles handed over by the neutrino generator, the trajectories of every
//! tracked particle, and the energy deposits recorded by each sensitive
//! detector. Units are those of the simulation: MeV, mm and ns.

use crate::{
    momentum::{self, Momentum, Position},
    numeric::Float,
    pdg,
};
use serde::{Deserialize, Serialize};

/// Parent id carried by primary trajectories
pub const NO_PARENT: i32 = -1;

/// Detector simulation record of one event
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdepEvent {
    /// Run number
    #[serde(default)]
    pub run_id: i32,

    /// Event number within the run
    #[serde(default)]
    pub event_id: i32,

    /// Interaction vertices, only the first one is used by the analyses
    #[serde(default)]
    pub primaries: Vec<PrimaryVertex>,

    /// Every tracked particle, indexed by track id
    #[serde(default)]
    pub trajectories: Vec<Trajectory>,

    /// Energy deposits, grouped by sensitive detector in detector order
    #[serde(default)]
    pub segment_detectors: Vec<SegmentDetector>,
}
//
impl EdepEvent {
    /// First interaction vertex, if the event has any
    pub fn primary_vertex(&self) -> Option<&PrimaryVertex> {
        self.primaries.first()
    }

    /// Look up a trajectory by track id
    ///
    /// edep-sim stores trajectories so that the track id is the position in
    /// the trajectory list, so that is tried first before falling back to a
    /// linear search.
    pub fn trajectory(&self, track_id: i32) -> Option<&Trajectory> {
        usize::try_from(track_id)
            .ok()
            .and_then(|idx| self.trajectories.get(idx))
            .filter(|trk| trk.track_id == track_id)
            .or_else(|| self.trajectories.iter().find(|trk| trk.track_id == track_id))
    }

    /// Trajectories whose parent is the given track, in trajectory order
    pub fn children(&self, track_id: i32) -> impl Iterator<Item = &Trajectory> {
        self.trajectories
            .iter()
            .filter(move |trk| trk.parent_id == track_id)
    }

    /// First trajectory whose PDG code matches `pdg` sign aside
    pub fn find_abs_pdg(&self, pdg: i32) -> Option<&Trajectory> {
        self.trajectories.iter().find(|trk| trk.pdg.abs() == pdg)
    }

    /// Every energy deposit of the event, in detector listing order
    pub fn deposits(&self) -> impl Iterator<Item = &SegmentDeposit> {
        self.segment_detectors
            .iter()
            .flat_map(|det| det.deposits.iter())
    }
}

/// Interaction vertex and the particles leaving it
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryVertex {
    /// Vertex 4-position (x, y, z, t)
    pub position: [Float; 4],

    /// Generator description of the reaction
    #[serde(default)]
    pub reaction: String,

    /// Particles emitted by the interaction
    #[serde(default)]
    pub particles: Vec<PrimaryParticle>,
}
//
impl PrimaryVertex {
    /// PDG codes of the primary particles, in generator order
    pub fn pdg_codes(&self) -> Vec<i32> {
        self.particles.iter().map(|p| p.pdg).collect()
    }

    /// Spatial position of the vertex
    pub fn position(&self) -> Position {
        momentum::position(&self.position)
    }
}

/// Particle handed over from the generator to the detector simulation
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryParticle {
    /// PDG code
    pub pdg: i32,

    /// Track id of the trajectory this particle starts
    pub track_id: i32,

    /// Particle name
    #[serde(default)]
    pub name: String,

    /// Initial 4-momentum (px, py, pz, E)
    pub momentum: [Float; 4],
}
//
impl PrimaryParticle {
    /// Initial 4-momentum
    pub fn momentum(&self) -> Momentum {
        momentum::from_array(self.momentum)
    }

    /// Particle name, falling back to a PDG lookup when none was recorded
    pub fn name(&self) -> &str {
        display_name(&self.name, self.pdg)
    }
}

/// Simulated path of a single tracked particle
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Unique track id within the event
    pub track_id: i32,

    /// Track id of the parent, NO_PARENT for primaries
    pub parent_id: i32,

    /// PDG code
    pub pdg: i32,

    /// Particle name
    #[serde(default)]
    pub name: String,

    /// Initial 4-momentum (px, py, pz, E)
    pub initial_momentum: [Float; 4],

    /// Sampled points along the path, from creation to end
    #[serde(default)]
    pub points: Vec<TrajectoryPoint>,
}
//
impl Trajectory {
    /// Initial 4-momentum
    pub fn initial_momentum(&self) -> Momentum {
        momentum::from_array(self.initial_momentum)
    }

    /// Truth that this track was emitted by the interaction itself
    pub fn is_primary(&self) -> bool {
        self.parent_id == NO_PARENT
    }

    /// Position of the first trajectory point
    pub fn start(&self) -> Option<Position> {
        self.points.first().map(TrajectoryPoint::position)
    }

    /// Position of the last trajectory point
    pub fn end(&self) -> Option<Position> {
        self.points.last().map(TrajectoryPoint::position)
    }

    /// Particle name, falling back to a PDG lookup when none was recorded
    pub fn name(&self) -> &str {
        display_name(&self.name, self.pdg)
    }
}

/// Sample of a trajectory
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// 4-position (x, y, z, t)
    pub position: [Float; 4],

    /// 3-momentum at this point
    pub momentum: [Float; 3],
}
//
impl TrajectoryPoint {
    /// Spatial position of the point
    pub fn position(&self) -> Position {
        momentum::position(&self.position)
    }

    /// Norm of the 3-momentum at this point
    pub fn momentum_norm(&self) -> Float {
        Position::from(self.momentum).norm()
    }
}

/// Energy deposits recorded by one sensitive detector
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentDetector {
    /// Sensitive detector name
    pub name: String,

    /// Deposits in recording order
    #[serde(default)]
    pub deposits: Vec<SegmentDeposit>,
}

/// Energy deposited along a short track segment
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentDeposit {
    /// Track id of the primary ancestor of the depositing particle
    pub primary_id: i32,

    /// Track ids of the contributing particles, leading contributor first
    #[serde(default)]
    pub contributors: Vec<i32>,

    /// Deposited energy (MeV)
    pub energy_deposit: Float,

    /// Segment start 4-position
    #[serde(default)]
    pub start: [Float; 4],

    /// Segment stop 4-position
    pub stop: [Float; 4],
}
//
impl SegmentDeposit {
    /// Track which contributed the most to this deposit
    pub fn leading_contributor(&self) -> Option<i32> {
        self.contributors.first().copied()
    }

    /// Spatial position at the end of the segment
    pub fn stop_position(&self) -> Position {
        momentum::position(&self.stop)
    }
}

fn display_name(name: &str, pdg: i32) -> &str {
    if name.is_empty() {
        pdg::name(pdg)
    } else {
        name
    }
}
