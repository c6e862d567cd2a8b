use std::io;
use std::path::Path;

use crate::{Error, Result};

#[derive(Debug)]
pub struct UsbtmcDriverImpl;

impl UsbtmcDriverImpl {
    pub fn new(_device_path: &Path) -> Result<UsbtmcDriverImpl> {
        Err(Error::Unsupported)
    }
}

impl super::Driver for UsbtmcDriverImpl {
    fn write(&self, _data: &[u8]) -> io::Result<()> {
        Err(io::ErrorKind::Unsupported.into())
    }

    fn read(&self, _data: &mut [u8]) -> io::Result<usize> {
        Err(io::ErrorKind::Unsupported.into())
    }

    fn close(self) -> io::Result<()> {
        Ok(())
    }
}
