//! Command line and the status mode config file

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use crate::sink::Rotation;

/// Weekly whereabouts endpoint on the R&D network
pub const DEFAULT_WEEK_URL: &str = "http://vm-94-205.rd.bbc.co.uk/getwhereabouts/user";

/// Headline drawn in week mode
pub const DEFAULT_TITLE: &str = "Where is Todd?";

/// What gets shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Today plus the rest of the working week
    Week,
    /// A single status description, redrawn only when it changes
    Status,
}

#[derive(Debug, Parser)]
#[command(version, about = "Show where someone is on a three-colour e-paper HAT")]
pub struct Args {
    #[arg(long, value_enum, default_value_t = Mode::Week)]
    pub mode: Mode,

    /// Endpoint to poll; required in status mode
    #[arg(long)]
    pub url: Option<String>,

    /// Read the week from a JSON file instead of the network
    #[arg(long, value_name = "JSON")]
    pub offline: Option<PathBuf>,

    /// Status mode config: caption, user id, token, last description
    #[arg(long, default_value = "resources/config.txt")]
    pub config: PathBuf,

    /// ID card drawn behind everything, same size as the frame
    #[arg(long, default_value = "resources/id-card.png")]
    pub id_card: PathBuf,

    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Seconds before giving up on the endpoint
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Frame rotation in degrees
    #[arg(long, default_value = "270")]
    pub rotation: Rotation,

    /// Save the frame as PNG instead of driving the panel
    #[arg(long, value_name = "PNG")]
    pub preview: Option<PathBuf>,

    /// Refresh the panel even if the status has not changed
    #[arg(long)]
    pub force: bool,
}

impl Args {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn week_url(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_WEEK_URL)
    }
}

const CAPTION: usize = 0;
const USER_ID: usize = 1;
const TOKEN: usize = 2;
const DESCRIPTION: usize = 3;
const FIELDS: usize = 4;

/// Four line text file used in status mode
///
/// The last line holds the description that is currently on the panel and is
/// rewritten after every refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl StatusFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
        Self::parse(path, &contents)
    }

    pub fn parse(path: &Path, contents: &str) -> Result<Self> {
        let lines: Vec<String> = contents.lines().map(str::to_string).collect();
        if lines.len() < FIELDS {
            bail!(
                "{} has {} lines, expected caption, user id, token and description",
                path.display(),
                lines.len()
            );
        }
        Ok(Self {
            path: path.to_path_buf(),
            lines,
        })
    }

    pub fn caption(&self) -> &str {
        &self.lines[CAPTION]
    }

    pub fn user_id(&self) -> &str {
        &self.lines[USER_ID]
    }

    pub fn token(&self) -> &str {
        &self.lines[TOKEN]
    }

    /// Description currently on the panel
    pub fn description(&self) -> &str {
        &self.lines[DESCRIPTION]
    }

    /// Line breaks would shift the fields, they become spaces
    pub fn set_description(&mut self, description: &str) {
        self.lines[DESCRIPTION] = description.replace(['\r', '\n'], " ");
    }

    pub fn save(&self) -> Result<()> {
        let mut contents = self.lines.join("\n");
        contents.push('\n');
        fs::write(&self.path, contents)
            .with_context(|| format!("Writing {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "Where is Todd?\ntodd\nsecret\nIn the lab\n";

    #[test]
    fn defaults_to_week_mode_on_the_panel() {
        let args = Args::try_parse_from(["whereis"]).unwrap();
        assert_eq!(args.mode, Mode::Week);
        assert_eq!(args.rotation, Rotation::Rotate270);
        assert_eq!(args.week_url(), DEFAULT_WEEK_URL);
        assert_eq!(args.timeout(), Duration::from_secs(10));
        assert!(args.preview.is_none());
    }

    #[test]
    fn parses_status_options() {
        let args = Args::try_parse_from([
            "whereis",
            "--mode",
            "status",
            "--url",
            "http://status.example",
            "--date",
            "2021-06-07",
            "--rotation",
            "90",
            "--force",
        ])
        .unwrap();
        assert_eq!(args.mode, Mode::Status);
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2021, 6, 7));
        assert_eq!(args.rotation, Rotation::Rotate90);
        assert!(args.force);
    }

    #[test]
    fn rejects_odd_rotation() {
        assert!(Args::try_parse_from(["whereis", "--rotation", "45"]).is_err());
    }

    #[test]
    fn status_file_fields() {
        let file = StatusFile::parse(Path::new("config.txt"), CONFIG).unwrap();
        assert_eq!(file.caption(), "Where is Todd?");
        assert_eq!(file.user_id(), "todd");
        assert_eq!(file.token(), "secret");
        assert_eq!(file.description(), "In the lab");
    }

    #[test]
    fn short_status_file_is_rejected() {
        let err = StatusFile::parse(Path::new("config.txt"), "caption\ntodd\n").unwrap_err();
        assert!(err.to_string().contains("2 lines"));
    }

    #[test]
    fn description_survives_a_save() {
        let path = std::env::temp_dir().join(format!("whereis-config-{}.txt", std::process::id()));
        fs::write(&path, CONFIG).unwrap();

        let mut file = StatusFile::load(&path).unwrap();
        file.set_description("Working\nfrom home");
        file.save().unwrap();

        let reloaded = StatusFile::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(reloaded.description(), "Working from home");
        assert_eq!(reloaded.token(), "secret");
    }
}
