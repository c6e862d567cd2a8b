use std::ffi::{CStr, CString};
use std::io;
use std::mem::ManuallyDrop;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use libc::{c_int, c_void};
use crate::{Error, Result};

#[derive(Debug)]
struct Fd(c_int);

impl Fd {
    fn open(path: &CStr) -> io::Result<Fd> {
        unsafe {
            let fd = libc::open(path.as_ptr(), libc::O_RDWR | libc::O_CLOEXEC);
            if fd == -1 {
                Err(io::Error::last_os_error())
            } else {
                Ok(Fd(fd))
            }
        }
    }

    fn write(&self, data: &[u8]) -> io::Result<()> {
        unsafe {
            let bytes_written = libc::write(self.0, data.as_ptr() as *const c_void, data.len());
            if bytes_written == -1 {
                Err(io::Error::last_os_error())
            } else if bytes_written as usize != data.len() {
                // the usbtmc driver treats every write as one message; a split command is garbage
                Err(io::Error::new(io::ErrorKind::WriteZero,
                    format!("short write: {} of {} bytes", bytes_written, data.len())))
            } else {
                Ok(())
            }
        }
    }

    fn read(&self, data: &mut [u8]) -> io::Result<usize> {
        unsafe {
            let bytes_read = libc::read(self.0, data.as_mut_ptr() as *mut c_void, data.len());
            if bytes_read == -1 {
                Err(io::Error::last_os_error())
            } else {
                Ok(bytes_read as usize)
            }
        }
    }

    fn close(self) -> io::Result<()> {
        let fd = ManuallyDrop::new(self);
        unsafe {
            if libc::close(fd.0) == -1 {
                Err(io::Error::last_os_error())
            } else {
                Ok(())
            }
        }
    }
}

impl Drop for Fd {
    fn drop(&mut self) {
        unsafe {
            if libc::close(self.0) == -1 {
                log::error!("error closing fd: {}", io::Error::last_os_error())
            }
        }
    }
}

#[derive(Debug)]
pub struct UsbtmcDriverImpl {
    fd: Fd,
}

impl UsbtmcDriverImpl {
    pub fn new(device_path: &Path) -> Result<UsbtmcDriverImpl> {
        let open_error = |cause| Error::DeviceOpen { path: device_path.to_owned(), cause };
        let c_path = CString::new(device_path.as_os_str().as_bytes())
            .map_err(|nul_error| open_error(io::Error::new(io::ErrorKind::InvalidInput, nul_error)))?;
        let fd = Fd::open(c_path.as_ref()).map_err(open_error)?;
        log::debug!("opened {} as fd {}", device_path.display(), fd.0);
        Ok(UsbtmcDriverImpl { fd })
    }
}

impl super::Driver for UsbtmcDriverImpl {
    fn write(&self, data: &[u8]) -> io::Result<()> {
        self.fd.write(data)
    }

    fn read(&self, data: &mut [u8]) -> io::Result<usize> {
        self.fd.read(data)
    }

    fn close(self) -> io::Result<()> {
        log::debug!("closing fd {}", self.fd.0);
        self.fd.close()
    }
}
