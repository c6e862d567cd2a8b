//! What to capture, from where, and where the table goes.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::ChannelSet;

/// Device node created by the Linux usbtmc driver for the first instrument.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/usbtmc0";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Destination {
    #[default]
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// A blank name means standard output.
    pub fn from_name(name: &str) -> Destination {
        if name.is_empty() {
            Destination::Stdout
        } else {
            Destination::File(PathBuf::from(name))
        }
    }

    pub fn open(&self) -> io::Result<Box<dyn Write>> {
        Ok(match self {
            Self::Stdout => Box::new(io::stdout().lock()),
            Self::File(path) => Box::new(BufWriter::new(File::create(path)?)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfiguration {
    pub device_path: PathBuf,
    pub channels: ChannelSet,
    pub destination: Destination,
}

impl Default for CaptureConfiguration {
    fn default() -> Self {
        Self {
            device_path: PathBuf::from(DEFAULT_DEVICE_PATH),
            channels: ChannelSet::Both,
            destination: Default::default(),
        }
    }
}
