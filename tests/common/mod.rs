//! Synthetic events shared by the integration tests

#![allow(dead_code)]

use edepsim_analysis::{
    event::{
        EdepEvent, PrimaryParticle, PrimaryVertex, SegmentDeposit, SegmentDetector, Trajectory,
        TrajectoryPoint,
    },
    genie::{GenieRecord, StdHepEntry},
    numeric::Float,
    pdg,
    source::EventFile,
};

/// Vertex in the middle of the active volume
pub const VERTEX: [Float; 4] = [0., 430., 0., 0.];

pub fn primary(pdg: i32, track_id: i32, momentum: [Float; 4]) -> PrimaryParticle {
    PrimaryParticle {
        pdg,
        track_id,
        momentum,
        ..Default::default()
    }
}

/// Event whose first vertex emits the given particles, at rest, with no
/// trajectory
pub fn event_with_primaries(event_id: i32, pdgs: &[i32]) -> EdepEvent {
    EdepEvent {
        event_id,
        primaries: vec![PrimaryVertex {
            position: VERTEX,
            reaction: String::new(),
            particles: (0..)
                .zip(pdgs)
                .map(|(track_id, &pdg)| primary(pdg, track_id, [0.; 4]))
                .collect(),
        }],
        ..Default::default()
    }
}

/// NC elastic event: a muon neutrino and a proton of momentum `p` along z,
/// stopping at `end_z`
pub fn nc_elastic_event(event_id: i32, p: Float, end_z: Float) -> EdepEvent {
    let p4 = [0., 0., p, (p * p + pdg::PROTON_MASS * pdg::PROTON_MASS).sqrt()];
    let point = |z: Float, p: Float| TrajectoryPoint {
        position: [0., 430., z, 0.],
        momentum: [0., 0., p],
    };
    EdepEvent {
        event_id,
        primaries: vec![PrimaryVertex {
            position: VERTEX,
            reaction: "nu:14;tgt:1000180400;N:2212;proc:Weak[NC],QES;".to_owned(),
            particles: vec![
                primary(pdg::NU_MU, -1, [0., 0., 2000., 2000.]),
                primary(pdg::PROTON, 0, p4),
            ],
        }],
        trajectories: vec![Trajectory {
            track_id: 0,
            parent_id: -1,
            pdg: pdg::PROTON,
            name: "proton".to_owned(),
            initial_momentum: p4,
            points: vec![point(0., p), point(end_z, 0.)],
        }],
        segment_detectors: vec![SegmentDetector {
            name: "TPCActive".to_owned(),
            deposits: vec![SegmentDeposit {
                primary_id: 0,
                contributors: vec![0],
                energy_deposit: 0.8 * (p4[3] - pdg::PROTON_MASS),
                start: [0., 430., 0., 0.],
                stop: [0., 430., end_z, 1.],
            }],
        }],
        ..Default::default()
    }
}

/// Generator record with a single incoming muon neutrino
pub fn numu_record(energy_gev: Float) -> GenieRecord {
    GenieRecord {
        evt_code: "nu:14;tgt:1000180400;".to_owned(),
        particles: vec![
            StdHepEntry {
                status: 0,
                pdg: pdg::NU_MU,
                p4: [0., 0., energy_gev, energy_gev],
            },
            StdHepEntry {
                status: 0,
                pdg: 1000180400,
                p4: [0., 0., 0., 37.2],
            },
        ],
    }
}

/// Pair detector events with generator records tagged by event id
pub fn event_file(edep_events: Vec<EdepEvent>) -> EventFile {
    let genie_events = edep_events
        .iter()
        .map(|event| GenieRecord {
            evt_code: format!("event {}", event.event_id),
            ..numu_record(2.)
        })
        .collect();
    EventFile {
        edep_events,
        genie_events,
    }
}
