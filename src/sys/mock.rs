//! Scripted instrument used by unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write(String),
    Read(usize),
    Close,
}

#[derive(Debug, Default)]
pub struct MockDriver {
    responses: HashMap<String, Vec<u8>>,
    pending: RefCell<Option<Vec<u8>>>,
    events: Rc<RefCell<Vec<Event>>>,
    pub fail_writes: bool,
    pub fail_reads: bool,
}

impl MockDriver {
    pub fn new() -> MockDriver {
        MockDriver::default()
    }

    /// Reply to `command` with `response` every time it is written.
    pub fn respond(mut self, command: &str, response: impl AsRef<[u8]>) -> MockDriver {
        self.responses.insert(command.to_owned(), response.as_ref().to_vec());
        self
    }

    /// Shared log of everything the driver has been asked to do, in order.
    pub fn events(&self) -> Rc<RefCell<Vec<Event>>> {
        self.events.clone()
    }

    pub fn written(events: &Rc<RefCell<Vec<Event>>>) -> Vec<String> {
        events.borrow().iter().filter_map(|event| match event {
            Event::Write(command) => Some(command.clone()),
            _ => None,
        }).collect()
    }
}

impl super::Driver for MockDriver {
    fn write(&self, data: &[u8]) -> io::Result<()> {
        let command = String::from_utf8_lossy(data).into_owned();
        self.events.borrow_mut().push(Event::Write(command.clone()));
        if self.fail_writes {
            return Err(io::ErrorKind::BrokenPipe.into())
        }
        *self.pending.borrow_mut() = self.responses.get(&command).cloned();
        Ok(())
    }

    fn read(&self, data: &mut [u8]) -> io::Result<usize> {
        self.events.borrow_mut().push(Event::Read(data.len()));
        if self.fail_reads {
            return Err(io::Error::from_raw_os_error(libc::EIO))
        }
        match self.pending.borrow_mut().take() {
            Some(response) => {
                let count = response.len().min(data.len());
                data[..count].copy_from_slice(&response[..count]);
                Ok(count)
            }
            None => Err(io::Error::from_raw_os_error(libc::ETIMEDOUT)),
        }
    }

    fn close(self) -> io::Result<()> {
        self.events.borrow_mut().push(Event::Close);
        Ok(())
    }
}
