//! Request/response discipline shared by every instrument on the usbtmc bus.

use crate::Result;
use crate::sys::Driver;
use crate::transport::Transport;

/// Response budget for ordinary queries.
pub const DEFAULT_RESPONSE_LENGTH: usize = 300;

#[derive(Debug)]
pub struct InstrumentSession<D: Driver> {
    transport: Transport<D>,
}

impl<D: Driver> InstrumentSession<D> {
    pub fn new(transport: Transport<D>) -> InstrumentSession<D> {
        InstrumentSession { transport }
    }

    pub fn write(&mut self, command: &str) -> Result<()> {
        log::debug!("write({:?})", command);
        self.transport.write(command.as_bytes())
    }

    pub fn query(&mut self, command: &str) -> Vec<u8> {
        self.query_with_length(command, DEFAULT_RESPONSE_LENGTH)
    }

    /// Write `command`, then read whatever the instrument has ready, up to `length` bytes.
    ///
    /// There is no polling: an empty result means the instrument had nothing to say within
    /// the driver timeout, or that the command could not be sent at all.
    pub fn query_with_length(&mut self, command: &str, length: usize) -> Vec<u8> {
        if let Err(error) = self.write(command) {
            log::warn!("query({:?}) not sent: {}", command, error);
            return Vec::new()
        }
        let response = self.transport.read(length);
        log::debug!("query({:?}) = {} bytes", command, response.len());
        response
    }

    pub fn identify(&mut self) -> String {
        let response = self.query("*IDN?");
        String::from_utf8_lossy(&response).trim_end().to_owned()
    }

    pub fn reset(&mut self) -> Result<()> {
        self.write("*RST")
    }

    pub fn close(self) -> Result<()> {
        self.transport.close()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Error;
    use crate::sys::mock::{Event, MockDriver};

    #[test]
    fn test_query_writes_then_reads() {
        let driver = MockDriver::new().respond(":TRIGGER:STATUS?", "T'D\n");
        let events = driver.events();
        let mut session = InstrumentSession::new(Transport::new(driver));
        assert_eq!(session.query(":TRIGGER:STATUS?"), b"T'D\n");
        assert_eq!(*events.borrow(), [
            Event::Write(":TRIGGER:STATUS?".to_owned()),
            Event::Read(DEFAULT_RESPONSE_LENGTH),
        ]);
    }

    #[test]
    fn test_query_without_response() {
        let mut session = InstrumentSession::new(Transport::new(MockDriver::new()));
        assert!(session.query(":TIM:SCAL?").is_empty());
    }

    #[test]
    fn test_query_write_failure() {
        let mut driver = MockDriver::new().respond("*IDN?", "RIGOL");
        driver.fail_writes = true;
        let events = driver.events();
        let mut session = InstrumentSession::new(Transport::new(driver));
        assert!(session.query("*IDN?").is_empty());
        assert_eq!(*events.borrow(), [Event::Write("*IDN?".to_owned())]);
    }

    #[test]
    fn test_identify() {
        let driver = MockDriver::new()
            .respond("*IDN?", "Rigol Technologies,DS1102E,DS1EB104702974,00.02.01.01.00\n");
        let mut session = InstrumentSession::new(Transport::new(driver));
        assert_eq!(session.identify(), "Rigol Technologies,DS1102E,DS1EB104702974,00.02.01.01.00");
    }

    #[test]
    fn test_identify_silent_instrument() {
        let mut session = InstrumentSession::new(Transport::new(MockDriver::new()));
        assert_eq!(session.identify(), "");
    }

    #[test]
    fn test_reset() {
        let driver = MockDriver::new();
        let events = driver.events();
        let mut session = InstrumentSession::new(Transport::new(driver));
        session.reset().unwrap();
        session.close().unwrap();
        assert_eq!(*events.borrow(), [Event::Write("*RST".to_owned()), Event::Close]);
    }

    #[test]
    fn test_write_failure() {
        let mut driver = MockDriver::new();
        driver.fail_writes = true;
        let mut session = InstrumentSession::new(Transport::new(driver));
        assert!(matches!(session.reset(), Err(Error::Write(_))));
    }
}
