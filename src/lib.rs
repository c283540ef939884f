//! edep-sim analysis: truth-level studies of simulated neutrino events
//!
//!
//! # Introduction (for the physicist)
//!
//! This crate reads neutrino interactions which were generated by GENIE and
//! propagated through a liquid argon detector by edep-sim, and studies them
//! at the truth level.
//!
//! Two selections are provided. The neutral-current elastic selection looks
//! at single protons knocked out by a muon neutrino, and compares their true
//! kinetic energy with the energy they deposit. The kaon selection looks at
//! charged-current events in which a K0s decays into two charged pions, and
//! reconstructs the K0s mass from the pions either calorimetrically or from
//! their range.
//!
//! Both rely on a simple geometrical model of the active volume, a 1340 mm
//! cube, and on a classifier which tells whether all visible hadronic
//! activity of an event stays inside of it.
//!
//!
//! # Introduction (for the computer guy)
//!
//! Events are read from JSON containers holding two parallel tables, one for
//! the detector simulation and one for the generator record. Each analysis
//! runs a per-event kernel over batches of events, filling explicit
//! accumulators which are merged in batch order, optionally on several
//! threads. Results are histograms, written as JSON with the bin layout of
//! ROOT.
//!
//! A skimmer extracts the events with a primary kaon into a smaller file, and
//! an inspector prints out the contents of individual events on demand.

#![warn(missing_docs)]

pub mod analysis;
pub mod config;
pub mod containment;
pub mod deposit;
pub mod event;
pub mod genie;
pub mod histogram;
pub mod inspector;
pub mod momentum;
pub mod numeric;
pub mod output;
pub mod pdg;
pub mod range;
pub mod scheduling;
pub mod skim;
pub mod source;

/// We'll use eyre's type-erased result type throughout the library
pub type Result<T> = eyre::Result<T>;
