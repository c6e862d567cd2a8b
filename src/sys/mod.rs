use std::io;

/// Raw access to the instrument's character device.
///
/// Implementations perform exactly one system call per operation and report the OS error
/// unchanged; the timeout and logging policy lives in [`crate::Transport`].
pub trait Driver {
    fn write(&self, data: &[u8]) -> io::Result<()>;
    fn read(&self, data: &mut [u8]) -> io::Result<usize>;

    fn close(self) -> io::Result<()> where Self: Sized;
}

#[cfg(unix)]
#[path = "linux.rs"]
pub mod imp;

#[cfg(not(unix))]
#[path = "stub.rs"]
pub mod imp;

#[cfg(test)]
pub mod mock;
