//! Charged-current events with a neutral kaon decaying to two charged pions
//!
//! The K0s is looked up among all trajectories, its decay must be exactly
//! π⁻π⁺, and its mass is reconstructed from the calorimetric energy of the
//! pions and, for comparison, from their range.

use crate::{
    analysis::{angle_to_beam, report, Progress, Rejection},
    config::Configuration,
    containment, deposit,
    event::Trajectory,
    genie,
    histogram::{Hist1D, Hist2D, Histogram},
    momentum,
    numeric::{Float, GEV_TO_MEV, MM_TO_CM},
    pdg, range,
    scheduling::{self, Merge},
    source::{EventChain, EventRecord},
};
use tracing::{debug, info, warn};

/// Daughters of a K0s → π⁻π⁺ decay, in trajectory order
pub const DECAY_SIGNATURE: [i32; 2] = [-pdg::PI_PLUS, pdg::PI_PLUS];

/// Default name of the output file
pub const DEFAULT_OUTPUT: &str = "kaon_output.json";

/// Accumulated results of the kaon analysis
#[derive(Clone, Debug, PartialEq)]
pub struct KaonResults {
    /// K0s angle to the beam versus kinetic energy
    pub kaon_angle_ke: Hist2D,
    /// Muon angle to the beam versus kinetic energy
    pub muon_angle_ke: Hist2D,
    /// K0s mass from the pion energy deposits
    pub kaon_mass: Hist1D,
    /// K0s mass from the pion ranges
    pub kaon_mass_range: Hist1D,
    /// Charged pion kinetic energy
    pub pion_ke: Hist1D,
    /// Four-momentum transfer, in GeV²
    pub q2: Hist1D,
    /// Distance between the neutrino vertex and the K0s decay point
    pub vertex_distance: Hist1D,

    /// Number of events looked at
    pub num_events: usize,
    /// Number of events which passed the selection
    pub num_selected: usize,
    /// Number of selected events without a generator neutrino
    pub num_missing_neutrino: usize,
}
//
impl KaonResults {
    /// Set up empty histograms and counters
    pub fn new() -> Self {
        let pcos = |name: &str| {
            Hist2D::new(
                name,
                &format!("{name};#theta; True KE (MeV)"),
                45,
                0.,
                90.,
                50,
                0.,
                10000.,
            )
        };
        Self {
            kaon_angle_ke: pcos("k0_pcos"),
            muon_angle_ke: pcos("mu_pcos"),
            kaon_mass: Hist1D::new("k0_mass", "k0_mass;Mass (MeV); N", 50, 0., 1000.),
            kaon_mass_range: Hist1D::new(
                "k0_mass_range",
                "k0_mass_range;Mass (MeV); N",
                50,
                0.,
                1000.,
            ),
            pion_ke: Hist1D::new("pion_T", "pion_T;T (MeV); N", 100, 0., 5000.),
            q2: Hist1D::new("h_q2", "h_q2", 50, 0., 5.),
            vertex_distance: Hist1D::new("vtx_dist", "vtx_dist;d (cm); N", 100, 0., 20.),
            num_events: 0,
            num_selected: 0,
            num_missing_neutrino: 0,
        }
    }

    /// Log the event counts
    pub fn log_summary(&self) {
        info!("Total events: {}", self.num_events);
        info!("Selected K0s events: {}", self.num_selected);
        if self.num_missing_neutrino > 0 {
            warn!(
                "{} selected events had no generator neutrino",
                self.num_missing_neutrino
            );
        }
    }

    /// Histograms to be written out, in output order
    pub fn into_histograms(self) -> Vec<Histogram> {
        vec![
            self.kaon_angle_ke.into(),
            self.muon_angle_ke.into(),
            self.kaon_mass.into(),
            self.kaon_mass_range.into(),
            self.pion_ke.into(),
            self.q2.into(),
            self.vertex_distance.into(),
        ]
    }
}
//
impl Default for KaonResults {
    fn default() -> Self {
        Self::new()
    }
}
//
impl Merge for KaonResults {
    fn merge(&mut self, other: Self) {
        self.kaon_angle_ke.merge(other.kaon_angle_ke);
        self.muon_angle_ke.merge(other.muon_angle_ke);
        self.kaon_mass.merge(other.kaon_mass);
        self.kaon_mass_range.merge(other.kaon_mass_range);
        self.pion_ke.merge(other.pion_ke);
        self.q2.merge(other.q2);
        self.vertex_distance.merge(other.vertex_distance);
        self.num_events += other.num_events;
        self.num_selected += other.num_selected;
        self.num_missing_neutrino += other.num_missing_neutrino;
    }
}

/// Run the kaon selection over an event chain
pub fn run(cfg: &Configuration, chain: &EventChain) -> KaonResults {
    let num_events = chain.len();
    let progress = Progress::new(num_events, cfg.progress_steps);
    scheduling::run_event_loop(num_events, |events| {
        let mut results = KaonResults::new();
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
    results: &mut KaonResults,
) -> Result<(), Rejection> {
    results.num_events += 1;
    let event = record.edep;

    if !containment::is_hadronic_contained(event, cfg.low_energy_threshold) {
        return Err(Rejection::HadronicLeakage);
    }

    let vtx = event.primary_vertex().ok_or(Rejection::NoPrimaryVertex)?;
    let primary_pdg = vtx.pdg_codes();
    if !pdg::any_abs_in(&primary_pdg, &[pdg::MUON]) || !pdg::any_abs_in(&primary_pdg, &pdg::KAONS)
    {
        return Err(Rejection::PrimarySignature);
    }

    let kaon = event
        .find_abs_pdg(pdg::K_SHORT)
        .ok_or(Rejection::NoDecayCandidate)?;
    let muon = event.find_abs_pdg(pdg::MUON);

    let decay: Vec<&Trajectory> = event.children(kaon.track_id).collect();
    if decay.iter().map(|trk| trk.pdg).ne(DECAY_SIGNATURE) {
        return Err(Rejection::DecayTopology);
    }
    results.num_selected += 1;

    let kaon_init = kaon.initial_momentum();
    results
        .kaon_angle_ke
        .fill(angle_to_beam(cfg, &kaon_init), momentum::kinetic_energy(&kaon_init));

    if let Some(muon) = muon {
        let muon_init = muon.initial_momentum();
        results
            .muon_angle_ke
            .fill(angle_to_beam(cfg, &muon_init), momentum::kinetic_energy(&muon_init));

        match genie::find_neutrino(record.genie) {
            Some(nu) => {
                let q2 = -momentum::mag2(&(muon_init - nu.momentum)) / (GEV_TO_MEV * GEV_TO_MEV);
                results.q2.fill(q2);
            }
            None => {
                warn!("Event {}: no neutrino in the generator record", record.index);
                results.num_missing_neutrino += 1;
            }
        }
    }

    match kaon.end() {
        Some(decay_point) => {
            let distance = (vtx.position() - decay_point).norm() * MM_TO_CM;
            results.vertex_distance.fill(distance);
        }
        None => debug!("Event {}: K0s trajectory has no point", record.index),
    }

    // With primary id attribution, secondary pions own no deposit and only
    // their rest mass enters the sum
    let calo_mass: Float = decay
        .iter()
        .map(|pion| {
            deposit::energy_deposit_with_children(event, pion.track_id, cfg.kaon_attribution)
                + pdg::PION_MASS
        })
        .sum();
    results.kaon_mass.fill(calo_mass);

    let range_mass: Float = decay
        .iter()
        .map(|pion| {
            range::energy_by_range(range::track_length(pion) * MM_TO_CM) + pdg::PION_MASS
        })
        .sum();
    results.kaon_mass_range.fill(range_mass);

    for pion in decay.iter().filter(|trk| trk.pdg.abs() == pdg::PI_PLUS) {
        results
            .pion_ke
            .fill(momentum::kinetic_energy(&pion.initial_momentum()));
    }

    debug!(
        "Event {}: K0s mass {:.3} (calorimetry) vs {:.3} (range)",
        record.index, calo_mass, range_mass
    );
    Ok(())
}
