//! Interactive inspection of individual events
//!
//! An [`EventSnapshot`] borrows one event of an [`EventChain`] along with its
//! generator record. The query functions print what they find to any writer,
//! and a small command interpreter drives them from a terminal or a script.

use crate::{
    containment,
    deposit::{self, Attribution},
    event::{EdepEvent, PrimaryVertex, Trajectory, NO_PARENT},
    genie::{self, GenieRecord, Neutrino},
    momentum::{self, Momentum},
    numeric::{Float, GEV_TO_MEV},
    pdg,
    source::EventChain,
    Result,
};
use clap::{error::ErrorKind, Parser, Subcommand};
use eyre::format_err;
use std::io::{BufRead, Write};

/// Read-only view of one event
#[derive(Clone, Debug)]
pub struct EventSnapshot<'chain> {
    /// Position of the event in the chain
    pub index: usize,

    /// Detector simulation record
    pub event: &'chain EdepEvent,

    /// Generator record
    pub genie: &'chain GenieRecord,

    /// First interaction vertex
    pub vertex: &'chain PrimaryVertex,

    /// Incoming neutrino, if the generator record has one
    pub neutrino: Option<Neutrino>,
}
//
impl<'chain> EventSnapshot<'chain> {
    /// Look up a trajectory, failing on unknown track ids
    pub fn track(&self, track_id: i32) -> Result<&'chain Trajectory> {
        self.event
            .trajectory(track_id)
            .ok_or_else(|| format_err!("Event {} has no track {}", self.index, track_id))
    }
}

/// Take a snapshot of an event of the chain
pub fn load_event(chain: &EventChain, index: usize) -> Result<EventSnapshot<'_>> {
    let record = chain
        .get(index)
        .ok_or_else(|| format_err!("No event {} in a chain of {} events", index, chain.len()))?;
    let vertex = record
        .edep
        .primary_vertex()
        .ok_or_else(|| format_err!("Event {} has no primary vertex", index))?;
    Ok(EventSnapshot {
        index,
        event: record.edep,
        genie: record.genie,
        vertex,
        neutrino: genie::find_neutrino(record.genie),
    })
}

/// Print the generator particle stack, with status names or raw codes
pub fn list_genie_stack(
    snap: &EventSnapshot<'_>,
    status_names: bool,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "EvtCode:  {}", snap.genie.evt_code)?;
    for particle in &snap.genie.particles {
        if status_names {
            writeln!(out, "Status: {} | PDG: {:3}", particle.status(), particle.pdg)?;
        } else {
            writeln!(out, "Status: {:3} | PDG: {:3}", particle.status, particle.pdg)?;
        }
    }
    Ok(())
}

/// Print the neutrino, the outgoing lepton, the energy and momentum
/// transfers, the vertex and the reaction
///
/// The lepton is the last primary of the lepton family.
pub fn list_event_kinematics(snap: &EventSnapshot<'_>, out: &mut impl Write) -> Result<()> {
    let (lep_pdg, lep_vec) = snap
        .vertex
        .particles
        .iter()
        .rev()
        .find(|p| pdg::is_lepton(p.pdg))
        .map_or((0, Momentum::zeros()), |p| (p.pdg, p.momentum()));

    list_neutrino(snap, out)?;
    writeln!(
        out,
        "PDG: {:3} | E: {:.3}, P: {:.3}",
        lep_pdg,
        lep_vec[momentum::E],
        momentum::p(&lep_vec)
    )?;
    if let Some(nu) = &snap.neutrino {
        let q0 = (nu.momentum[momentum::E] - lep_vec[momentum::E]) / GEV_TO_MEV;
        let q3 = (momentum::xyz(&nu.momentum) - momentum::xyz(&lep_vec)).norm() / GEV_TO_MEV;
        let q2 = q3 * q3 - q0 * q0;
        writeln!(out, "Q^2: {:.3}, q0: {:.3}, q3: {:.3} GeV", q2, q0, q3)?;
    }
    let pos = snap.vertex.position();
    writeln!(out, "VTX: ({:.2}, {:.2}, {:.2})", pos.x, pos.y, pos.z)?;
    writeln!(out, "Reaction: {}", snap.vertex.reaction)?;
    Ok(())
}

/// Print the neutrino flavour and energy
pub fn list_neutrino(snap: &EventSnapshot<'_>, out: &mut impl Write) -> Result<()> {
    match &snap.neutrino {
        Some(nu) => writeln!(out, "PDG: {:3} | E: {:.3}", nu.pdg, nu.momentum[momentum::E])?,
        None => writeln!(out, "No neutrino in the generator record")?,
    }
    Ok(())
}

/// Print the particles leaving the interaction vertex
pub fn list_primaries(snap: &EventSnapshot<'_>, out: &mut impl Write) -> Result<()> {
    for particle in &snap.vertex.particles {
        writeln!(
            out,
            "PDG: {:5} {:12} | TrkID: {:2} T: {:.3}",
            particle.pdg,
            particle.name(),
            particle.track_id,
            momentum::kinetic_energy(&particle.momentum())
        )?;
    }
    Ok(())
}

/// Print the parent of a track, or the neutrino for primary tracks
pub fn list_parent(snap: &EventSnapshot<'_>, track_id: i32, out: &mut impl Write) -> Result<()> {
    let trk = snap.track(track_id)?;
    if trk.is_primary() {
        writeln!(out, "Primary particle. Parent ID is {}", NO_PARENT)?;
        list_neutrino(snap, out)
    } else {
        trk_print(snap.track(trk.parent_id)?, out)
    }
}

/// Print the direct children of a track, except for the excluded PDG codes
pub fn list_children(
    snap: &EventSnapshot<'_>,
    track_id: i32,
    exclude: &[i32],
    out: &mut impl Write,
) -> Result<()> {
    snap.track(track_id)?;
    for child in snap
        .event
        .children(track_id)
        .filter(|trk| !exclude.contains(&trk.pdg))
    {
        trk_print(child, out)?;
    }
    Ok(())
}

/// Print a track followed by all its ancestors, up to the primary track
pub fn list_ancestors(snap: &EventSnapshot<'_>, track_id: i32, out: &mut impl Write) -> Result<()> {
    let mut trk = snap.track(track_id)?;
    write!(out, "\u{2605} ")?;
    trk_print(trk, out)?;

    // Bounded by the number of tracks in case the parent links loop
    for _ in 0..snap.event.trajectories.len() {
        if trk.is_primary() {
            return Ok(());
        }
        trk = snap.track(trk.parent_id)?;
        write!(out, "\u{2BA1} ")?;
        trk_print(trk, out)?;
    }
    Err(format_err!("Ancestry of track {} does not reach a primary", track_id))
}

/// Print every track with the given PDG code
pub fn find_particle(snap: &EventSnapshot<'_>, pdg_code: i32, out: &mut impl Write) -> Result<()> {
    for trk in snap.event.trajectories.iter().filter(|trk| trk.pdg == pdg_code) {
        trk_print(trk, out)?;
    }
    Ok(())
}

/// Energy deposited by a track
pub fn energy_deposit_trk(
    snap: &EventSnapshot<'_>,
    track_id: i32,
    attribution: Attribution,
) -> Result<Float> {
    snap.track(track_id)?;
    Ok(deposit::energy_deposit(snap.event, track_id, attribution))
}

/// Print everything known about a track
pub fn trk_info(snap: &EventSnapshot<'_>, track_id: i32, out: &mut impl Write) -> Result<()> {
    let trk = snap.track(track_id)?;
    let p4 = trk.initial_momentum();
    let parent_name = if trk.is_primary() {
        "Primary"
    } else {
        snap.track(trk.parent_id)?.name()
    };
    let edep = energy_deposit_trk(snap, track_id, Attribution::LeadingContributor)?;

    writeln!(
        out,
        "PDG   : {:8} {:5} | TrkID: {:4}",
        trk.name(),
        trk.pdg,
        trk.track_id
    )?;
    writeln!(out, "Parent: {:14} | TrkID: {:4}", parent_name, trk.parent_id)?;
    writeln!(
        out,
        "Energy = {:.3}, P = {:.3}, T = {:.3}",
        p4[momentum::E],
        momentum::p(&p4),
        momentum::kinetic_energy(&p4)
    )?;
    writeln!(out, "Energy deposited: {:.4}", edep)?;
    for (label, pos) in [("Start", trk.start()), ("End  ", trk.end())] {
        match pos {
            Some(pos) => writeln!(out, "{} : ({:.2}, {:.2}, {:.2})", label, pos.x, pos.y, pos.z)?,
            None => writeln!(out, "{} : no trajectory point", label)?,
        }
    }
    writeln!(out, "Contained: {}", containment::is_track_contained(trk))?;
    Ok(())
}

/// One-line summary of a track
fn trk_print(trk: &Trajectory, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "PDG: {:5} {:8} | TrkID: {:4} T: {:.3}",
        trk.pdg,
        trk.name(),
        trk.track_id,
        momentum::kinetic_energy(&trk.initial_momentum())
    )?;
    Ok(())
}

/// Inspector commands
#[derive(Debug, Parser)]
#[command(no_binary_name = true, name = "inspector")]
struct CommandLine {
    #[command(subcommand)]
    command: Command,
}

/// Command of the interactive inspector
#[derive(Clone, Debug, PartialEq, Subcommand)]
pub enum Command {
    /// Load another event
    Event {
        /// Event number
        index: usize,
    },

    /// Print the generator particle stack
    Stack {
        /// Print status names instead of codes
        #[arg(long)]
        names: bool,
    },

    /// Print the event kinematics
    Kinematics,

    /// Print the incoming neutrino
    Neutrino,

    /// Print the primary particles
    Primaries,

    /// Print the parent of a track
    Parent {
        /// Track id
        id: i32,
    },

    /// Print the children of a track
    Children {
        /// Track id
        id: i32,

        /// PDG code of children not to print
        #[arg(long, allow_negative_numbers = true)]
        exclude: Vec<i32>,
    },

    /// Print a track and its ancestors
    Ancestors {
        /// Track id
        id: i32,
    },

    /// Print all tracks with a PDG code
    Find {
        /// PDG code
        #[arg(allow_negative_numbers = true)]
        pdg: i32,
    },

    /// Print the energy deposited by a track
    Edep {
        /// Track id
        id: i32,

        /// Deposit attribution policy, "leading" or "primary"
        #[arg(long, default_value = "leading", value_parser = parse_attribution)]
        attribution: Attribution,
    },

    /// Print everything about a track
    Track {
        /// Track id
        id: i32,
    },

    /// Leave the inspector
    #[command(alias = "exit")]
    Quit,
}

fn parse_attribution(s: &str) -> std::result::Result<Attribution, String> {
    s.parse().map_err(|e: eyre::Report| e.to_string())
}

/// Parse one command line. Blank lines are `Ok(None)`.
pub fn parse_command(line: &str) -> std::result::Result<Option<Command>, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    CommandLine::try_parse_from(words).map(|cli| Some(cli.command))
}

/// Whether the inspector should keep reading commands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command
    Continue,
    /// Stop here
    Quit,
}

/// Inspector state: the chain and the currently loaded event
#[derive(Debug)]
pub struct Session<'chain> {
    chain: &'chain EventChain,
    snapshot: EventSnapshot<'chain>,
}
//
impl<'chain> Session<'chain> {
    /// Start inspecting a chain at some event
    pub fn new(chain: &'chain EventChain, index: usize) -> Result<Self> {
        Ok(Self {
            chain,
            snapshot: load_event(chain, index)?,
        })
    }

    /// Currently loaded event
    pub fn snapshot(&self) -> &EventSnapshot<'chain> {
        &self.snapshot
    }

    /// Run one command
    pub fn execute(&mut self, command: &Command, out: &mut impl Write) -> Result<Flow> {
        let snap = &self.snapshot;
        match command {
            Command::Event { index } => {
                self.snapshot = load_event(self.chain, *index)?;
                writeln!(out, "Loaded event {}", index)?;
            }
            Command::Stack { names } => list_genie_stack(snap, *names, out)?,
            Command::Kinematics => list_event_kinematics(snap, out)?,
            Command::Neutrino => list_neutrino(snap, out)?,
            Command::Primaries => list_primaries(snap, out)?,
            Command::Parent { id } => list_parent(snap, *id, out)?,
            Command::Children { id, exclude } => list_children(snap, *id, exclude, out)?,
            Command::Ancestors { id } => list_ancestors(snap, *id, out)?,
            Command::Find { pdg } => find_particle(snap, *pdg, out)?,
            Command::Edep { id, attribution } => {
                let edep = energy_deposit_trk(snap, *id, *attribution)?;
                writeln!(out, "Energy deposited: {:.4}", edep)?;
            }
            Command::Track { id } => trk_info(snap, *id, out)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Parse and run one command line, failing on bad commands
    pub fn execute_line(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        match parse_command(line) {
            Ok(Some(command)) => self.execute(&command, out),
            Ok(None) => Ok(Flow::Continue),
            Err(err) if err.kind() == ErrorKind::DisplayHelp => {
                write!(out, "{}", err.render())?;
                Ok(Flow::Continue)
            }
            Err(err) => Err(format_err!(
                "Invalid command {:?}\n{}",
                line.trim(),
                err.render()
            )),
        }
    }

    /// Read commands until the input ends or a quit command
    ///
    /// Failed commands are reported and do not end the session.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<()> {
        let mut lines = input.lines();
        loop {
            write!(out, "[event {}] > ", self.snapshot.index)?;
            out.flush()?;
            let Some(line) = lines.next() else {
                writeln!(out)?;
                return Ok(());
            };
            match self.execute_line(&line?, out) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => return Ok(()),
                Err(err) => writeln!(out, "Error: {:#}", err)?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        event::{PrimaryParticle, SegmentDeposit, SegmentDetector, TrajectoryPoint},
        genie::StdHepEntry,
        source::EventFile,
    };

    fn trajectory(track_id: i32, parent_id: i32, pdg: i32, name: &str) -> Trajectory {
        Trajectory {
            track_id,
            parent_id,
            pdg,
            name: name.to_owned(),
            initial_momentum: [0., 0., 0., 1000.],
            points: vec![
                TrajectoryPoint {
                    position: [0., 430., 0., 0.],
                    momentum: [0., 0., 0.],
                },
                TrajectoryPoint {
                    position: [10., 420., 700., 1.],
                    momentum: [0., 0., 0.],
                },
            ],
        }
    }

    fn chain() -> EventChain {
        let event = EdepEvent {
            primaries: vec![PrimaryVertex {
                position: [1., 430., -2., 0.],
                reaction: "nu:14;tgt:1000180400;proc:Weak[CC],QES;".to_owned(),
                particles: vec![
                    PrimaryParticle {
                        pdg: 13,
                        track_id: 0,
                        name: "mu-".to_owned(),
                        momentum: [0., 0., 1000., 1005.],
                    },
                    PrimaryParticle {
                        pdg: 2212,
                        track_id: 1,
                        name: "proton".to_owned(),
                        momentum: [0., 0., 0., 938.272],
                    },
                ],
            }],
            trajectories: vec![
                trajectory(0, -1, 13, "mu-"),
                trajectory(1, -1, 2212, "proton"),
                trajectory(2, 1, -211, "pi-"),
                trajectory(3, 1, 22, "gamma"),
                trajectory(4, 2, 11, "e-"),
            ],
            segment_detectors: vec![SegmentDetector {
                name: "TPCActive".to_owned(),
                deposits: vec![
                    SegmentDeposit {
                        primary_id: 1,
                        contributors: vec![2, 4],
                        energy_deposit: 12.5,
                        ..Default::default()
                    },
                    SegmentDeposit {
                        primary_id: 1,
                        contributors: vec![4],
                        energy_deposit: 1.5,
                        ..Default::default()
                    },
                ],
            }],
            ..Default::default()
        };
        let genie = GenieRecord {
            evt_code: "CCQE".to_owned(),
            particles: vec![
                StdHepEntry {
                    status: 0,
                    pdg: 14,
                    p4: [0., 0., 2., 2.],
                },
                StdHepEntry {
                    status: 1,
                    pdg: 13,
                    p4: [0., 0., 1., 1.005],
                },
            ],
        };
        EventChain::from_files(vec![EventFile {
            edep_events: vec![event, EdepEvent::default()],
            genie_events: vec![genie, GenieRecord::default()],
        }])
    }

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn loading_events() {
        let chain = chain();
        let snap = load_event(&chain, 0).unwrap();
        assert_eq!(snap.neutrino.as_ref().map(|nu| nu.pdg), Some(14));
        assert!(load_event(&chain, 1).is_err(), "event without vertex");
        assert!(load_event(&chain, 2).is_err(), "out of range");
    }

    #[test]
    fn stack_and_kinematics() {
        let chain = chain();
        let snap = load_event(&chain, 0).unwrap();

        let stack = output(|out| list_genie_stack(&snap, true, out));
        assert_eq!(
            stack,
            "EvtCode:  CCQE\n\
             Status: kIStInitialState | PDG:  14\n\
             Status: kIStStableFinalState | PDG:  13\n"
        );
        let stack = output(|out| list_genie_stack(&snap, false, out));
        assert!(stack.contains("Status:   0 | PDG:  14"));

        let kinematics = output(|out| list_event_kinematics(&snap, out));
        assert_eq!(
            kinematics,
            "PDG:  14 | E: 2000.000\n\
             PDG:  13 | E: 1005.000, P: 1000.000\n\
             Q^2: 0.010, q0: 0.995, q3: 1.000 GeV\n\
             VTX: (1.00, 430.00, -2.00)\n\
             Reaction: nu:14;tgt:1000180400;proc:Weak[CC],QES;\n"
        );
    }

    #[test]
    fn track_relations() {
        let chain = chain();
        let snap = load_event(&chain, 0).unwrap();

        let parent = output(|out| list_parent(&snap, 0, out));
        assert!(parent.starts_with("Primary particle. Parent ID is -1\nPDG:  14"));
        let parent = output(|out| list_parent(&snap, 4, out));
        assert!(parent.starts_with("PDG:  -211 pi-      | TrkID:    2"));

        let children = output(|out| list_children(&snap, 1, &[], out));
        assert_eq!(children.lines().count(), 2);
        let children = output(|out| list_children(&snap, 1, &[22], out));
        assert_eq!(children.lines().count(), 1);
        assert!(children.contains("pi-"));

        let ancestors = output(|out| list_ancestors(&snap, 4, out));
        let ids: Vec<_> = ancestors
            .lines()
            .map(|line| line.split("TrkID:").nth(1).unwrap().split_whitespace().next().unwrap())
            .collect();
        assert_eq!(ids, ["4", "2", "1"]);
        assert!(ancestors.starts_with('\u{2605}'));

        let found = output(|out| find_particle(&snap, -211, out));
        assert_eq!(found.lines().count(), 1);

        assert!(list_parent(&snap, 42, &mut std::io::sink()).is_err());
        assert!(list_children(&snap, 42, &[], &mut std::io::sink()).is_err());
    }

    #[test]
    fn deposits_and_track_info() {
        let chain = chain();
        let snap = load_event(&chain, 0).unwrap();
        assert_eq!(
            energy_deposit_trk(&snap, 2, Attribution::LeadingContributor).unwrap(),
            12.5
        );
        assert_eq!(
            energy_deposit_trk(&snap, 1, Attribution::PrimaryId).unwrap(),
            14.
        );
        assert!(energy_deposit_trk(&snap, 9, Attribution::PrimaryId).is_err());

        let info = output(|out| trk_info(&snap, 2, out));
        assert!(info.contains("Parent: proton         | TrkID:    1"));
        assert!(info.contains("Energy deposited: 12.5000"));
        assert!(info.contains("Start : (0.00, 430.00, 0.00)"));
        assert!(info.contains("End   : (10.00, 420.00, 700.00)"));
        assert!(info.ends_with("Contained: false\n"));
    }

    #[test]
    fn command_parsing() {
        assert_eq!(parse_command("  ").unwrap(), None);
        assert_eq!(
            parse_command("children 3 --exclude 22 --exclude -11").unwrap(),
            Some(Command::Children {
                id: 3,
                exclude: vec![22, -11]
            })
        );
        assert_eq!(
            parse_command("edep 4").unwrap(),
            Some(Command::Edep {
                id: 4,
                attribution: Attribution::LeadingContributor
            })
        );
        assert_eq!(
            parse_command("edep 4 --attribution primary").unwrap(),
            Some(Command::Edep {
                id: 4,
                attribution: Attribution::PrimaryId
            })
        );
        assert_eq!(
            parse_command("find -211").unwrap(),
            Some(Command::Find { pdg: -211 })
        );
        assert!(parse_command("edep 4 --attribution both").is_err());
        assert!(parse_command("teleport 4").is_err());
    }

    #[test]
    fn interactive_session() {
        let chain = chain();
        let mut session = Session::new(&chain, 0).unwrap();
        let input = "primaries\ntrack 99\n\nedep 1 --attribution primary\nevent 1\nquit\nneutrino\n";
        let transcript = output(|out| session.run(input.as_bytes(), out));
        assert!(transcript.contains("PDG:    13 mu-          | TrkID:  0 T: 904.875"));
        assert!(transcript.contains("Error: Event 0 has no track 99"));
        assert!(transcript.contains("Energy deposited: 14.0000"));
        assert!(transcript.contains("Error: No event 1") || transcript.contains("Error: Event 1"));
        // Nothing runs after quit
        assert!(!transcript.contains("E: 2000.000"));
        assert_eq!(session.snapshot().index, 0);

        let mut out = Vec::new();
        assert_eq!(session.execute_line("quit", &mut out).unwrap(), Flow::Quit);
        assert!(session.execute_line("parent", &mut out).is_err());
    }
}
