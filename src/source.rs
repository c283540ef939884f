//! Access to simulated event files
//!
//! An event file holds two parallel tables: the detector simulation events
//! and the generator pass-through records, joined by their position. Several
//! files are chained one after the other into a single event index space.

use crate::{event::EdepEvent, genie::GenieRecord, Result};
use eyre::{ensure, WrapErr};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};
use tracing::debug;

/// Contents of one event file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFile {
    /// Detector simulation table
    #[serde(rename = "EDepSimEvents")]
    pub edep_events: Vec<EdepEvent>,

    /// Generator pass-through table
    #[serde(rename = "gRooTracker", alias = "DetSimPassThru/gRooTracker")]
    pub genie_events: Vec<GenieRecord>,
}
//
impl EventFile {
    /// Read an event file and check that its tables line up
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(
            File::open(path).wrap_err_with(|| format!("Failed to open {}", path.display()))?,
        );
        let file: Self = serde_json::from_reader(reader)
            .wrap_err_with(|| format!("Failed to parse {}", path.display()))?;
        ensure!(
            file.edep_events.len() == file.genie_events.len(),
            "{} holds {} detector events but {} generator records",
            path.display(),
            file.edep_events.len(),
            file.genie_events.len()
        );
        debug!("Loaded {} events from {}", file.len(), path.display());
        Ok(file)
    }

    /// Write the event file to disk, replacing any previous file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(
            File::create(path).wrap_err_with(|| format!("Failed to create {}", path.display()))?,
        );
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.edep_events.len()
    }

    /// Truth that the file holds no event
    pub fn is_empty(&self) -> bool {
        self.edep_events.is_empty()
    }

    /// Append an event to both tables
    pub fn push(&mut self, record: EventRecord<'_>) {
        self.edep_events.push(record.edep.clone());
        self.genie_events.push(record.genie.clone());
    }
}

/// One event, seen through both tables
#[derive(Clone, Copy, Debug)]
pub struct EventRecord<'chain> {
    /// Position of the event in the chain
    pub index: usize,

    /// Detector simulation record
    pub edep: &'chain EdepEvent,

    /// Generator pass-through record
    pub genie: &'chain GenieRecord,
}

/// Events of several files, chained in order
#[derive(Clone, Debug, Default)]
pub struct EventChain {
    files: Vec<EventFile>,
}
//
impl EventChain {
    /// Load a list of event files
    pub fn open<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let files = paths
            .iter()
            .map(EventFile::load)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_files(files))
    }

    /// Chain event files which are already in memory
    pub fn from_files(files: Vec<EventFile>) -> Self {
        Self { files }
    }

    /// Total number of events
    pub fn len(&self) -> usize {
        self.files.iter().map(EventFile::len).sum()
    }

    /// Truth that the chain holds no event
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Access an event by its position in the chain
    pub fn get(&self, index: usize) -> Option<EventRecord<'_>> {
        let mut local = index;
        for file in &self.files {
            if local < file.len() {
                return Some(EventRecord {
                    index,
                    edep: &file.edep_events[local],
                    genie: &file.genie_events[local],
                });
            }
            local -= file.len();
        }
        None
    }

    /// Iterate over all events in order
    pub fn iter(&self) -> impl Iterator<Item = EventRecord<'_>> {
        self.files
            .iter()
            .flat_map(|file| file.edep_events.iter().zip(&file.genie_events))
            .enumerate()
            .map(|(index, (edep, genie))| EventRecord { index, edep, genie })
    }
}
