//! Attribution of recorded energy deposits to individual tracks
//!
//! A deposit records both the primary ancestor of the depositing particles
//! and the list of contributing tracks. Those give two different answers to
//! "how much energy did this track deposit", and which one is right depends on
//! whether the track of interest is a primary or a secondary.

use crate::{event::EdepEvent, momentum, numeric::Float, Result};
use eyre::bail;
use std::{fmt, str::FromStr};

/// Policy deciding which deposits belong to a track
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attribution {
    /// The track is the first (leading) contributor of the deposit
    LeadingContributor,

    /// The track is the primary ancestor recorded in the deposit
    ///
    /// Only primary tracks can ever match this way.
    PrimaryId,
}
//
impl FromStr for Attribution {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "leading" => Ok(Self::LeadingContributor),
            "primary" => Ok(Self::PrimaryId),
            other => bail!("Unknown attribution policy {other:?}, expected \"leading\" or \"primary\""),
        }
    }
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeadingContributor => f.write_str("leading"),
            Self::PrimaryId => f.write_str("primary"),
        }
    }
}

/// Energy deposited by a track, using the given attribution policy
pub fn energy_deposit(event: &EdepEvent, track_id: i32, attribution: Attribution) -> Float {
    match attribution {
        Attribution::LeadingContributor => energy_deposit_by_leading_contributor(event, track_id),
        Attribution::PrimaryId => energy_deposit_by_primary_id(event, track_id),
    }
}

/// Energy of all deposits whose leading contributor is the given track
pub fn energy_deposit_by_leading_contributor(event: &EdepEvent, track_id: i32) -> Float {
    event
        .deposits()
        .filter(|dep| dep.leading_contributor() == Some(track_id))
        .map(|dep| dep.energy_deposit)
        .sum()
}

/// Energy of all deposits whose primary ancestor is the given track
pub fn energy_deposit_by_primary_id(event: &EdepEvent, track_id: i32) -> Float {
    event
        .deposits()
        .filter(|dep| dep.primary_id == track_id)
        .map(|dep| dep.energy_deposit)
        .sum()
}

/// Energy deposited by a track and its direct children
///
/// Each contribution, the track's own included, is divided by the Lorentz
/// factor of the contributing track at creation. Grandchildren are ignored.
pub fn energy_deposit_with_children(
    event: &EdepEvent,
    track_id: i32,
    attribution: Attribution,
) -> Float {
    event
        .trajectories
        .iter()
        .filter(|trk| trk.track_id == track_id || trk.parent_id == track_id)
        .map(|trk| {
            let gamma = momentum::gamma(&trk.initial_momentum());
            energy_deposit(event, trk.track_id, attribution) / gamma
        })
        .sum()
}
