mod sys;
mod transport;
mod session;
mod channel;
mod config;
mod waveform;
mod scope;

use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    DeviceOpen { path: PathBuf, cause: io::Error },
    Write(io::Error),
    MalformedResponse { command: String, response: Vec<u8> },
    Unsupported,
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::DeviceOpen { path, cause } =>
                write!(f, "cannot open device {}: {}", path.display(), cause),
            Self::Write(io_error) =>
                write!(f, "write error: {}", io_error),
            Self::MalformedResponse { command, response } =>
                write!(f, "malformed response to {:?}: {:?}", command, String::from_utf8_lossy(response)),
            Self::Unsupported =>
                write!(f, "usbtmc character devices are not supported on this platform"),
            Self::Io(io_error) =>
                write!(f, "I/O error: {}", io_error),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            &Self::DeviceOpen { ref cause, .. } => Some(cause),
            &Self::Write(ref io_error) => Some(io_error),
            &Self::Io(ref io_error) => Some(io_error),
            _ => None
        }
    }
}

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::DeviceOpen { cause, .. } =>
                cause,
            Error::Write(io_error) | Error::Io(io_error) =>
                io_error,
            Error::MalformedResponse { .. } =>
                Self::new(io::ErrorKind::InvalidData, error),
            Error::Unsupported =>
                Self::new(io::ErrorKind::Unsupported, error),
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        match error.downcast::<Self>() {
            Ok(error) => error,
            Err(error) => Error::Io(error),
        }
    }
}

pub type Result<T> =
    core::result::Result<T, Error>;

pub use sys::Driver;

pub use transport::{
    ReadFailure,
    Transport,
};

pub use session::{
    InstrumentSession,
    DEFAULT_RESPONSE_LENGTH,
};

pub use channel::{
    Channel,
    ChannelSet,
};

pub use config::{
    Destination,
    CaptureConfiguration,
    DEFAULT_DEVICE_PATH,
};

pub use waveform::{
    RawWaveform,
    ScaledWaveform,
    decode,
    scale_voltage,
    build_time_axis,
    PREAMBLE_LENGTH,
    SAMPLE_COUNT,
};

pub use scope::PointsMode;

pub type UsbtmcDriver = sys::imp::UsbtmcDriverImpl;

pub type Scope =
    scope::Scope<UsbtmcDriver>;

pub use scope::Scope as GenericScope;
