// SPDX-License-Identifier: Apache-2.0

//! Handler backed by the file descriptors of the host process

use crate::libc::{self, c_int, EBADF, EINTR, EMFILE};
use crate::{Handler, Result, MAX_OPEN_FILES, STDIN, STDOUT};

use log::trace;

/// What a program-visible descriptor refers to
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Discards writes, reads as end of input
    Null,

    /// A descriptor of the host process
    Fd(c_int),
}

/// Descriptor table mapping program descriptors onto host descriptors
#[derive(Debug, Default)]
pub struct Host {
    table: [Option<Slot>; MAX_OPEN_FILES],
}

impl Host {
    /// An empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Host stdin as descriptor 0 and host stdout as descriptor 1
    pub fn stdio() -> Self {
        let mut host = Self::new();
        host.table[STDIN as usize] = Some(Slot::Fd(libc::STDIN_FILENO));
        host.table[STDOUT as usize] = Some(Slot::Fd(libc::STDOUT_FILENO));
        host
    }

    /// Places `slot` at the lowest free descriptor and returns it.
    pub fn push(&mut self, slot: Slot) -> Result<c_int> {
        let fd = self
            .table
            .iter()
            .position(Option::is_none)
            .ok_or(EMFILE)?;
        self.table[fd] = Some(slot);
        Ok(fd as _)
    }

    #[cfg(test)]
    fn install(&mut self, fd: c_int, slot: Slot) -> Result<()> {
        *self.entry(fd)? = Some(slot);
        Ok(())
    }

    #[cfg(test)]
    fn close(&mut self, fd: c_int) -> Result<()> {
        self.entry(fd)?.take().map(|_| ()).ok_or(EBADF)
    }

    /// The slot at `fd`, if open
    pub fn get(&self, fd: c_int) -> Option<Slot> {
        usize::try_from(fd)
            .ok()
            .and_then(|fd| self.table.get(fd).copied().flatten())
    }

    #[cfg(test)]
    fn entry(&mut self, fd: c_int) -> Result<&mut Option<Slot>> {
        usize::try_from(fd)
            .ok()
            .and_then(|fd| self.table.get_mut(fd))
            .ok_or(EBADF)
    }
}

fn errno() -> i32 {
    std::io::Error::last_os_error()
        .raw_os_error()
        .unwrap_or(libc::EIO)
}

impl Handler for Host {
    fn write(&mut self, fd: c_int, buf: &[u8]) -> Result<usize> {
        let ret = match self.get(fd).ok_or(EBADF)? {
            Slot::Null => buf.len(),
            Slot::Fd(hostfd) => loop {
                let ret = unsafe { libc::write(hostfd, buf.as_ptr() as _, buf.len()) };
                if ret >= 0 {
                    break ret as usize;
                }
                match errno() {
                    EINTR => continue,
                    e => {
                        trace!("write({}) -> errno {}", fd, e);
                        return Err(e);
                    }
                }
            },
        };

        trace!("write({}, {} bytes) -> {}", fd, buf.len(), ret);
        Ok(ret)
    }

    fn read(&mut self, fd: c_int, buf: &mut [u8]) -> Result<usize> {
        let ret = match self.get(fd).ok_or(EBADF)? {
            Slot::Null => 0,
            Slot::Fd(hostfd) => loop {
                let ret = unsafe { libc::read(hostfd, buf.as_mut_ptr() as _, buf.len()) };
                if ret >= 0 {
                    break ret as usize;
                }
                match errno() {
                    EINTR => continue,
                    e => {
                        trace!("read({}) -> errno {}", fd, e);
                        return Err(e);
                    }
                }
            },
        };

        trace!("read({}, {} bytes) -> {}", fd, buf.len(), ret);
        Ok(ret)
    }
}
