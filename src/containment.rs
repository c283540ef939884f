//! Mechanism to decide whether tracks and events are contained in the detector
//!
//! The active volume is a fixed axis-aligned box, 1340 mm on each side and
//! centered 430 mm above the origin of the detector frame.

use crate::{
    event::{EdepEvent, PrimaryParticle, Trajectory},
    momentum::{Position, E, X, Y, Z},
    numeric::Float,
    pdg,
};
use prefix_num_ops::real::*;
use std::collections::HashSet;

/// Half-extent of the active volume along each axis (mm)
pub const HALF_EXTENT: Float = 670.;

/// Offset of the active volume center along the vertical axis (mm)
pub const Y_OFFSET: Float = 430.;

/// Default initial energy below which tracks are considered invisible (MeV)
pub const LOW_ENERGY_THRESHOLD: Float = 10.;

/// Truth that a point lies in the active volume, boundary included
pub fn is_point_contained(pos: &Position) -> bool {
    abs(pos[X]) <= HALF_EXTENT && abs(pos[Y] - Y_OFFSET) <= HALF_EXTENT && abs(pos[Z]) <= HALF_EXTENT
}

/// Truth that a track ends in the active volume
///
/// Only the last trajectory point is tested. A trajectory without any point
/// cannot be placed anywhere and is reported as not contained.
pub fn is_track_contained(trk: &Trajectory) -> bool {
    trk.end().map_or(false, |end| is_point_contained(&end))
}

/// Extend a set of seed tracks to their descendants
///
/// This is a single forward pass over the trajectory list: a track joins the
/// lineage if it is a seed or if its parent already joined it earlier in the
/// pass. Feeding the output back in as the seed set yields the same set.
pub fn lineage_closure<'a>(
    trajectories: impl IntoIterator<Item = &'a Trajectory>,
    is_seed: impl Fn(&Trajectory) -> bool,
) -> HashSet<i32> {
    let mut lineage = HashSet::new();
    for trk in trajectories {
        if is_seed(trk) || lineage.contains(&trk.parent_id) {
            lineage.insert(trk.track_id);
        }
    }
    lineage
}

/// Track ids of all neutrons of an event and of their descendants
pub fn neutron_and_daughter_ids(event: &EdepEvent) -> HashSet<i32> {
    lineage_closure(&event.trajectories, |trk| trk.pdg == pdg::NEUTRON)
}

/// Track ids of all tracks whose initial total energy is below `threshold`
pub fn low_energy_ids(event: &EdepEvent, threshold: Float) -> HashSet<i32> {
    event
        .trajectories
        .iter()
        .filter(|trk| trk.initial_momentum()[E] < threshold)
        .map(|trk| trk.track_id)
        .collect()
}

/// Track ids of the particles whose PDG code is one of `pdgs`
pub fn track_ids_for_pdg(particles: &[PrimaryParticle], pdgs: &[i32]) -> Vec<i32> {
    particles
        .iter()
        .filter(|p| pdgs.contains(&p.pdg))
        .map(|p| p.track_id)
        .collect()
}

/// Truth that all visible hadronic activity of an event is contained
///
/// Deposits from the primary muon lineage, from neutrons and their
/// descendants, and from tracks below `low_energy_threshold` are ignored.
/// Every other deposit must stop inside the active volume.
pub fn is_hadronic_contained(event: &EdepEvent, low_energy_threshold: Float) -> bool {
    let neutron_ids = neutron_and_daughter_ids(event);
    let low_energy_ids = low_energy_ids(event, low_energy_threshold);
    let muon_ids = event
        .primary_vertex()
        .map(|vtx| track_ids_for_pdg(&vtx.particles, &[pdg::MUON, -pdg::MUON]))
        .unwrap_or_default();

    event.deposits().all(|dep| {
        if muon_ids.contains(&dep.primary_id) {
            return true;
        }
        if let Some(key) = dep.leading_contributor() {
            if neutron_ids.contains(&key) || low_energy_ids.contains(&key) {
                return true;
            }
        }
        is_point_contained(&dep.stop_position())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{PrimaryVertex, SegmentDeposit, SegmentDetector, TrajectoryPoint};
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256Plus;

    fn trajectory(track_id: i32, parent_id: i32, pdg: i32, energy: Float) -> Trajectory {
        Trajectory {
            track_id,
            parent_id,
            pdg,
            initial_momentum: [0., 0., 0., energy],
            ..Default::default()
        }
    }

    fn deposit(primary_id: i32, contributors: Vec<i32>, stop: [Float; 3]) -> SegmentDeposit {
        SegmentDeposit {
            primary_id,
            contributors,
            energy_deposit: 1.,
            stop: [stop[0], stop[1], stop[2], 0.],
            ..Default::default()
        }
    }

    #[test]
    fn box_boundaries_are_inclusive() {
        assert!(is_point_contained(&Position::new(0., 430., 0.)));
        assert!(is_point_contained(&Position::new(670., 1100., -670.)));
        assert!(is_point_contained(&Position::new(-670., -240., 670.)));
        assert!(!is_point_contained(&Position::new(670.001, 430., 0.)));
        assert!(!is_point_contained(&Position::new(0., -240.001, 0.)));
        assert!(!is_point_contained(&Position::new(0., 1100.001, 0.)));
        assert!(!is_point_contained(&Position::new(0., 430., -670.001)));
    }

    #[test]
    fn random_points_match_the_box() {
        let mut rng = Xoshiro256Plus::seed_from_u64(12345);
        for _ in 0..10_000 {
            let pos = Position::new(
                rng.gen_range(-1000.0..1000.0),
                rng.gen_range(-600.0..1500.0),
                rng.gen_range(-1000.0..1000.0),
            );
            let inside = (-670.0..=670.0).contains(&pos[X])
                && (-240.0..=1100.0).contains(&pos[Y])
                && (-670.0..=670.0).contains(&pos[Z]);
            assert_eq!(is_point_contained(&pos), inside, "{pos:?}");
        }
    }

    #[test]
    fn track_containment_uses_the_last_point() {
        let point = |x: Float| TrajectoryPoint {
            position: [x, 430., 0., 0.],
            momentum: [0.; 3],
        };
        let mut trk = trajectory(0, -1, 2212, 1000.);
        assert!(!is_track_contained(&trk));
        trk.points = vec![point(2000.), point(100.)];
        assert!(is_track_contained(&trk));
        trk.points = vec![point(100.), point(2000.)];
        assert!(!is_track_contained(&trk));
    }

    #[test]
    fn neutron_lineage_follows_listing_order() {
        let event = EdepEvent {
            trajectories: vec![
                trajectory(0, -1, 13, 500.),
                // Listed before its neutron parent, so not part of the lineage
                trajectory(1, 2, 22, 5.),
                trajectory(2, -1, 2112, 1000.),
                trajectory(3, 2, 2212, 1000.),
                trajectory(4, 3, 11, 20.),
                trajectory(5, 0, 11, 20.),
            ],
            ..Default::default()
        };
        let ids = neutron_and_daughter_ids(&event);
        assert_eq!(ids, HashSet::from([2, 3, 4]));

        // Re-running with the lineage as seeds yields the same set
        let again = lineage_closure(&event.trajectories, |trk| ids.contains(&trk.track_id));
        assert_eq!(again, ids);
    }

    #[test]
    fn lineage_closure_is_idempotent_on_random_forests() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        for _ in 0..200 {
            let num_tracks = rng.gen_range(1..40);
            let trajectories: Vec<_> = (0..num_tracks)
                .map(|id| {
                    let parent = rng.gen_range(-1..num_tracks);
                    let pdg = if rng.gen_bool(0.2) { 2112 } else { 211 };
                    trajectory(id, parent, pdg, 100.)
                })
                .collect();
            let once = lineage_closure(&trajectories, |trk| trk.pdg == 2112);
            let twice = lineage_closure(&trajectories, |trk| once.contains(&trk.track_id));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn hadronic_containment_ignores_invisible_activity() {
        let mut event = EdepEvent {
            primaries: vec![PrimaryVertex {
                particles: vec![PrimaryParticle {
                    pdg: 13,
                    track_id: 0,
                    ..Default::default()
                }],
                ..Default::default()
            }],
            trajectories: vec![
                trajectory(0, -1, 13, 2000.),
                trajectory(1, -1, 2212, 1200.),
                trajectory(2, -1, 2112, 1100.),
                trajectory(3, 2, 2212, 990.),
                trajectory(4, 1, 22, 3.),
            ],
            segment_detectors: vec![SegmentDetector {
                name: "TPCActive".to_owned(),
                deposits: vec![
                    // Escaping muon
                    deposit(0, vec![0], [5000., 430., 0.]),
                    // Escaping neutron descendant
                    deposit(2, vec![3], [0., 430., 5000.]),
                    // Escaping low-energy photon
                    deposit(1, vec![4], [0., 3000., 0.]),
                    // Contained proton
                    deposit(1, vec![1], [10., 430., 10.]),
                ],
            }],
            ..Default::default()
        };
        assert!(is_hadronic_contained(&event, LOW_ENERGY_THRESHOLD));

        // A lower threshold makes the photon visible
        assert!(!is_hadronic_contained(&event, 1.));

        // An escaping proton breaks containment
        event.segment_detectors[0]
            .deposits
            .push(deposit(1, vec![1], [800., 430., 0.]));
        assert!(!is_hadronic_contained(&event, LOW_ENERGY_THRESHOLD));
    }

    #[test]
    fn deposits_without_contributors_are_tested() {
        let mut event = EdepEvent {
            segment_detectors: vec![SegmentDetector {
                name: "TPCActive".to_owned(),
                deposits: vec![deposit(7, vec![], [0., 430., 0.])],
            }],
            ..Default::default()
        };
        assert!(is_hadronic_contained(&event, LOW_ENERGY_THRESHOLD));
        event.segment_detectors[0].deposits[0].stop = [0., 430., 700., 0.];
        assert!(!is_hadronic_contained(&event, LOW_ENERGY_THRESHOLD));
        assert!(is_hadronic_contained(&EdepEvent::default(), LOW_ENERGY_THRESHOLD));
    }
}
