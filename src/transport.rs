use std::fmt;
use std::io;
use std::path::Path;

use crate::{Error, Result};
use crate::sys::Driver;

/// Why a read produced no data.
///
/// Both cases look the same to the caller of [`Transport::read`] (an empty response); they are
/// kept apart so that an expired driver timeout is not logged as a fault.
#[derive(Debug)]
pub enum ReadFailure {
    Timeout,
    Other(io::Error),
}

impl ReadFailure {
    pub fn classify(error: io::Error) -> ReadFailure {
        if error.raw_os_error() == Some(libc::ETIMEDOUT) || error.kind() == io::ErrorKind::TimedOut {
            ReadFailure::Timeout
        } else {
            ReadFailure::Other(error)
        }
    }
}

impl fmt::Display for ReadFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Timeout =>
                write!(f, "read timeout"),
            Self::Other(io_error) =>
                write!(f, "read error: {}", io_error),
        }
    }
}

/// Exclusive owner of one device handle.
///
/// Closing consumes the transport, so no read or write can be issued on a released handle.
#[derive(Debug)]
pub struct Transport<D: Driver> {
    driver: D,
}

impl Transport<crate::sys::imp::UsbtmcDriverImpl> {
    pub fn open(device_path: impl AsRef<Path>) -> Result<Transport<crate::sys::imp::UsbtmcDriverImpl>> {
        let driver = crate::sys::imp::UsbtmcDriverImpl::new(device_path.as_ref())?;
        Ok(Transport { driver })
    }
}

impl<D: Driver> Transport<D> {
    pub fn new(driver: D) -> Transport<D> {
        Transport { driver }
    }

    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        log::trace!("write({:?})", String::from_utf8_lossy(data));
        self.driver.write(data).map_err(Error::Write)
    }

    /// Read at most `max_length` bytes, reporting why nothing arrived if that is the case.
    pub fn try_read(&mut self, max_length: usize) -> core::result::Result<Vec<u8>, ReadFailure> {
        let mut data = vec![0; max_length];
        let count = self.driver.read(&mut data[..]).map_err(ReadFailure::classify)?;
        data.truncate(count);
        log::trace!("read({}) = {} bytes: {:02x?}", max_length, count, &data[..count.min(32)]);
        Ok(data)
    }

    /// Read at most `max_length` bytes; any failure yields an empty response.
    pub fn read(&mut self, max_length: usize) -> Vec<u8> {
        match self.try_read(max_length) {
            Ok(data) => data,
            Err(failure @ ReadFailure::Timeout) => {
                log::warn!("{}", failure);
                Vec::new()
            }
            Err(failure) => {
                log::error!("{}", failure);
                Vec::new()
            }
        }
    }

    pub fn close(self) -> Result<()> {
        Ok(self.driver.close()?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sys::mock::{Event, MockDriver};

    #[test]
    fn test_classify_timeout() {
        let failure = ReadFailure::classify(io::Error::from_raw_os_error(libc::ETIMEDOUT));
        assert!(matches!(failure, ReadFailure::Timeout));
        let failure = ReadFailure::classify(io::ErrorKind::TimedOut.into());
        assert!(matches!(failure, ReadFailure::Timeout));
        let failure = ReadFailure::classify(io::Error::from_raw_os_error(libc::EPIPE));
        assert!(matches!(failure, ReadFailure::Other(_)));
    }

    #[test]
    fn test_read_timeout_is_empty() {
        let mut transport = Transport::new(MockDriver::new());
        assert!(matches!(transport.try_read(300), Err(ReadFailure::Timeout)));
        assert_eq!(transport.read(300), Vec::<u8>::new());
    }

    #[test]
    fn test_read_error_is_empty() {
        let mut driver = MockDriver::new().respond("*IDN?", "RIGOL");
        driver.fail_reads = true;
        let mut transport = Transport::new(driver);
        transport.write(b"*IDN?").unwrap();
        assert!(matches!(transport.try_read(300), Err(ReadFailure::Other(_))));
        assert_eq!(transport.read(300), Vec::<u8>::new());
    }

    #[test]
    fn test_read_truncates_to_max_length() {
        let mut transport = Transport::new(MockDriver::new().respond("*IDN?", "RIGOL TECHNOLOGIES"));
        transport.write(b"*IDN?").unwrap();
        assert_eq!(transport.read(5), b"RIGOL");
    }

    #[test]
    fn test_write_error() {
        let mut driver = MockDriver::new();
        driver.fail_writes = true;
        let mut transport = Transport::new(driver);
        assert!(matches!(transport.write(b":RUN"), Err(Error::Write(_))));
    }

    #[test]
    fn test_close() {
        let driver = MockDriver::new();
        let events = driver.events();
        Transport::new(driver).close().unwrap();
        assert_eq!(*events.borrow(), [Event::Close]);
    }
}
