//! Mechanism for loading and sharing the analysis configuration

use crate::{containment::LOW_ENERGY_THRESHOLD, deposit::Attribution, numeric::Float, Result};
use eyre::{bail, ensure, format_err, Error, WrapErr};
use nalgebra::Vector3;
use std::{fs, path::Path, str::FromStr};
use tracing::info;

/// Analysis configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    /// Neutrino beam direction in the detector frame (3.343° in the y-z plane)
    pub beam_direction: Vector3<Float>,

    /// Initial energy below which tracks are ignored by hadronic containment
    pub low_energy_threshold: Float,

    /// Deposit attribution used to reconstruct the K0s mass from its pions
    pub kaon_attribution: Attribution,

    /// Number of progress messages printed over an event loop
    pub progress_steps: usize,
}
//
impl Default for Configuration {
    fn default() -> Self {
        Self {
            beam_direction: Vector3::new(0., 0.05836, 1.0),
            low_energy_threshold: LOW_ENERGY_THRESHOLD,
            kaon_attribution: Attribution::PrimaryId,
            progress_steps: 10,
        }
    }
}
//
impl Configuration {
    /// Load the configuration from a file, check it, and print it out
    ///
    /// The file holds one `key value...` setting per line. Blank lines and
    /// text following a `#` are ignored. Settings which are not mentioned
    /// keep their default value.
    pub fn load(file_name: impl AsRef<Path>) -> Result<Self> {
        let file_name = file_name.as_ref();
        let config_str = fs::read_to_string(file_name)
            .wrap_err_with(|| format!("Failed to read {}", file_name.display()))?;
        let config = Self::parse(&config_str)?;
        config.print();
        Ok(config)
    }

    /// Decode configuration file contents
    pub fn parse(config_str: &str) -> Result<Self> {
        let mut config = Self::default();

        // Iterate over non-empty lines, with comments stripped
        let settings = config_str
            .lines()
            .map(|line| line.split('#').next().unwrap_or_default().trim())
            .filter(|line| !line.is_empty());

        for line in settings {
            let mut words = line.split_whitespace();
            let key = words.next().unwrap_or_default();
            let mut next_item = |name: &'static str| -> Result<ConfigItem> {
                words
                    .next()
                    .map(|data| ConfigItem::new(name, data))
                    .ok_or_else(|| format_err!("Missing value for {}", name))
            };
            match key {
                "beam_direction" => {
                    config.beam_direction = Vector3::new(
                        next_item("beam_direction.x")?.parse()?,
                        next_item("beam_direction.y")?.parse()?,
                        next_item("beam_direction.z")?.parse()?,
                    )
                }
                "low_energy_threshold" => {
                    config.low_energy_threshold = next_item("low_energy_threshold")?.parse()?
                }
                "kaon_attribution" => {
                    config.kaon_attribution = next_item("kaon_attribution")?.parse_with()?
                }
                "progress_steps" => config.progress_steps = next_item("progress_steps")?.parse()?,
                other => bail!("Unknown configuration key {:?}", other),
            }
            ensure!(
                words.next().is_none(),
                "Too many values in configuration line {:?}",
                line
            );
        }

        // A null beam direction makes every angle meaningless
        ensure!(
            config.beam_direction.norm() > 0.,
            "The beam direction must not be a null vector"
        );
        ensure!(config.progress_steps > 0, "Please print at least one progress message");

        Ok(config)
    }

    /// Log the configuration
    pub fn print(&self) {
        let beam = &self.beam_direction;
        info!("beam_direction       : ({}, {}, {})", beam.x, beam.y, beam.z);
        info!("low_energy_threshold : {} MeV", self.low_energy_threshold);
        info!("kaon_attribution     : {}", self.kaon_attribution);
        info!("progress_steps       : {}", self.progress_steps);
    }
}

/// A value from the configuration file, tagged with the setting which it
/// is supposed to fill for error reporting purposes.
struct ConfigItem<'data> {
    name: &'static str,
    data: &'data str,
}
//
impl<'data> ConfigItem<'data> {
    /// Build a config item from a setting name and raw data
    fn new(name: &'static str, data: &'data str) -> Self {
        Self { name, data }
    }

    /// Parse this data using Rust's standard parsing logic
    fn parse<T: FromStr>(self) -> Result<T>
    where
        <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
    {
        self.data
            .parse::<T>()
            .map_err(Error::new)
            .wrap_err_with(|| format!("Could not parse configuration of {}", self.name))
    }

    /// Parse this data with a parser which already reports through eyre
    fn parse_with<T: FromStr<Err = Error>>(self) -> Result<T> {
        self.data
            .parse::<T>()
            .wrap_err_with(|| format!("Could not parse configuration of {}", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_when_empty() {
        let config = Configuration::parse("\n# nothing to see\n\n").unwrap();
        assert_eq!(config, Configuration::default());
        assert_relative_eq!(config.beam_direction.y, 0.05836);
        assert_eq!(config.kaon_attribution, Attribution::PrimaryId);
    }

    #[test]
    fn overrides() {
        let config = Configuration::parse(
            "beam_direction 0 0 1   # on axis\n\
             low_energy_threshold 5.5\n\
             kaon_attribution leading\n\
             progress_steps 4\n",
        )
        .unwrap();
        assert_eq!(config.beam_direction, Vector3::new(0., 0., 1.));
        assert_relative_eq!(config.low_energy_threshold, 5.5);
        assert_eq!(config.kaon_attribution, Attribution::LeadingContributor);
        assert_eq!(config.progress_steps, 4);
    }

    #[test]
    fn errors_name_the_setting() {
        let err = Configuration::parse("low_energy_threshold ten").unwrap_err();
        assert!(err.to_string().contains("low_energy_threshold"));
        let err = Configuration::parse("beam_direction 0 1").unwrap_err();
        assert!(err.to_string().contains("beam_direction.z"));
        assert!(Configuration::parse("beam_energy 3").is_err());
        assert!(Configuration::parse("progress_steps 2 3").is_err());
        assert!(Configuration::parse("progress_steps 0").is_err());
        assert!(Configuration::parse("beam_direction 0 0 0").is_err());
        assert!(Configuration::parse("kaon_attribution both").is_err());
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.cfg");
        fs::write(&path, "progress_steps 20\n").unwrap();
        assert_eq!(Configuration::load(&path).unwrap().progress_steps, 20);
        assert!(Configuration::load(dir.path().join("missing.cfg")).is_err());
    }
}
