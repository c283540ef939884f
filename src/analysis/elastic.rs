//! Neutral-current elastic proton scattering (NC 1p)
//!
//! Selects events whose only primaries are a muon neutrino and a proton, and
//! compares the true proton kinetic energy with the energy it deposits when
//! it stops in the active volume.

use crate::{
    analysis::{angle_to_beam, report, Progress, Rejection},
    config::Configuration,
    containment,
    deposit,
    event::Trajectory,
    histogram::{Hist1D, Hist2D, Histogram},
    momentum,
    numeric::Float,
    pdg,
    scheduling::{self, Merge},
    source::{EventChain, EventRecord},
};
use tracing::{debug, info};

/// Primary particles of a NC 1p event, in generator order
pub const SIGNATURE: [i32; 2] = [pdg::NU_MU, pdg::PROTON];

/// Default name of the output file
pub const DEFAULT_OUTPUT: &str = "nc_elastic_output.json";

/// Accumulated results of the NC 1p analysis
#[derive(Clone, Debug, PartialEq)]
pub struct ElasticResults {
    /// True proton kinetic energy
    pub proton_ke: Hist1D,

    /// Proton angle to the beam versus true kinetic energy
    pub proton_angle_ke: Hist2D,

    /// Deposited energy versus true kinetic energy
    pub ke_smearing: Hist2D,

    /// Number of events looked at
    pub num_events: usize,

    /// Number of events matching the NC 1p signature
    pub num_nc1p: usize,

    /// Number of NC 1p events with a contained proton
    pub num_contained: usize,
}
//
impl ElasticResults {
    /// Set up empty histograms and counters
    pub fn new() -> Self {
        Self {
            proton_ke: Hist1D::new("pr_ke", "pr_ke;True KE (MeV); N", 100, 0., 2500.),
            proton_angle_ke: Hist2D::new(
                "pr_tcos",
                "pr_tcos;#theta; True KE (MeV)",
                45,
                0.,
                90.,
                100,
                0.,
                2500.,
            ),
            ke_smearing: Hist2D::new(
                "ke_smearing",
                "ke_smearing; Reco KE (MeV), True KE (MeV)",
                100,
                0.,
                2500.,
                100,
                0.,
                2500.,
            ),
            num_events: 0,
            num_nc1p: 0,
            num_contained: 0,
        }
    }

    /// Log the event counts
    pub fn log_summary(&self) {
        info!("Total events: {}", self.num_events);
        info!("Total NC1p: {}", self.num_nc1p);
        info!("Total cont: {}", self.num_contained);
    }

    /// Histograms to be written out, in output order
    pub fn into_histograms(self) -> Vec<Histogram> {
        vec![
            self.proton_ke.into(),
            self.proton_angle_ke.into(),
            self.ke_smearing.into(),
        ]
    }
}
//
impl Default for ElasticResults {
    fn default() -> Self {
        Self::new()
    }
}
//
impl Merge for ElasticResults {
    fn merge(&mut self, other: Self) {
        self.proton_ke.merge(other.proton_ke);
        self.proton_angle_ke.merge(other.proton_angle_ke);
        self.ke_smearing.merge(other.ke_smearing);
        self.num_events += other.num_events;
        self.num_nc1p += other.num_nc1p;
        self.num_contained += other.num_contained;
    }
}

/// Run the NC 1p selection over an event chain
pub fn run(cfg: &Configuration, chain: &EventChain) -> ElasticResults {
    let num_events = chain.len();
    let progress = Progress::new(num_events, cfg.progress_steps);
    scheduling::run_event_loop(num_events, |events| {
        let mut results = ElasticResults::new();
        for index in events {
            progress.tick(index);
            let record = chain.get(index).expect("Event index should be in range");
            report(index, process_event(cfg, &record, &mut results));
        }
        results
    })
}

/// Select one event and fill the results with it
pub fn process_event(
    cfg: &Configuration,
    record: &EventRecord<'_>,
    results: &mut ElasticResults,
) -> Result<(), Rejection> {
    results.num_events += 1;
    let event = record.edep;

    let vtx = event.primary_vertex().ok_or(Rejection::NoPrimaryVertex)?;
    let primary_pdg = vtx.pdg_codes();
    if primary_pdg != SIGNATURE {
        return Err(Rejection::PrimarySignature);
    }
    debug!("Event {}: {:?}", record.index, primary_pdg);
    results.num_nc1p += 1;

    // The signature guarantees that a proton is present
    let proton_tid = vtx
        .particles
        .iter()
        .rev()
        .find(|p| p.pdg == pdg::PROTON)
        .map_or(-1, |p| p.track_id);
    let proton_track = event
        .trajectory(proton_tid)
        .ok_or(Rejection::MissingTrack(proton_tid))?;

    if !containment::is_track_contained(proton_track) {
        return Err(Rejection::TrackNotContained);
    }
    results.num_contained += 1;

    let edep_energy = deposit::energy_deposit_by_leading_contributor(event, proton_tid);
    let traj_energy = trajectory_energy_loss(proton_track, pdg::PROTON_MASS);

    let proton_init = proton_track.initial_momentum();
    let proton_init_ke = momentum::kinetic_energy(&proton_init);
    let proton_init_angle = angle_to_beam(cfg, &proton_init);

    results.proton_ke.fill(proton_init_ke);
    results.proton_angle_ke.fill(proton_init_angle, proton_init_ke);
    results.ke_smearing.fill(edep_energy, proton_init_ke);

    debug!("Proton initial energy: {:.4}", proton_init_ke);
    debug!("Deposited energy : {:.4}", edep_energy);
    debug!("Trajectory energy: {:.4}", traj_energy);
    Ok(())
}

/// Kinetic energy lost along a trajectory, from the sampled momenta
///
/// This sums the kinetic energy drops between consecutive trajectory points,
/// assuming the given particle mass.
pub fn trajectory_energy_loss(trk: &Trajectory, mass: Float) -> Float {
    let kinetic_energies: Vec<Float> = trk
        .points
        .iter()
        .map(|pt| momentum::kinetic_energy_from_p(pt.momentum_norm(), mass))
        .collect();
    kinetic_energies
        .windows(2)
        .map(|pair| pair[0] - pair[1])
        .sum()
}
