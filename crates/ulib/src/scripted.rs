// SPDX-License-Identifier: Apache-2.0

//! In-memory handler with scripted input and fault injection

use crate::libc::{c_int, EBADF};
use crate::{Handler, Result, MAX_OPEN_FILES, STDIN, STDOUT};

use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec::Vec;

use log::trace;

/// Result forced onto a particular write
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fault {
    /// Transfer at most this many bytes
    Short(usize),

    /// Fail with this errno
    Errno(i32),
}

/// Handler reading standard input from a byte script and capturing output.
///
/// Standard output is open; further output descriptors can be opened with
/// [`Scripted::open`]. Only standard input can be read.
#[derive(Debug, Default)]
pub struct Scripted {
    input: VecDeque<u8>,
    output: BTreeMap<c_int, Vec<u8>>,
    faults: BTreeMap<usize, Fault>,
    writes: usize,
    reads: usize,
}

impl Scripted {
    /// Creates a handler whose standard input yields `input`, then end of
    /// input.
    pub fn new(input: &[u8]) -> Self {
        let mut output = BTreeMap::new();
        output.insert(STDOUT, Vec::new());

        Self {
            input: input.iter().copied().collect(),
            output,
            ..Default::default()
        }
    }

    /// Opens `fd` for output.
    pub fn open(&mut self, fd: c_int) -> &mut Self {
        self.output.entry(fd).or_default();
        self
    }

    /// Forces the `nth` write call (counting from zero) to return `fault`.
    pub fn fault(&mut self, nth: usize, fault: Fault) -> &mut Self {
        self.faults.insert(nth, fault);
        self
    }

    /// Everything written to standard output so far
    pub fn stdout(&self) -> &[u8] {
        self.output(STDOUT)
    }

    /// Everything written to `fd` so far
    pub fn output(&self, fd: c_int) -> &[u8] {
        self.output.get(&fd).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of write calls made, including failed ones
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Number of read calls made
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Input not yet consumed
    pub fn pending(&self) -> usize {
        self.input.len()
    }
}

impl Handler for Scripted {
    fn write(&mut self, fd: c_int, buf: &[u8]) -> Result<usize> {
        let nth = self.writes;
        self.writes += 1;

        if fd < 0 || fd as usize >= MAX_OPEN_FILES {
            return Err(EBADF);
        }
        let out = self.output.get_mut(&fd).ok_or(EBADF)?;

        let len = match self.faults.get(&nth) {
            Some(Fault::Errno(errno)) => {
                trace!("write #{} to fd {}: forced errno {}", nth, fd, errno);
                return Err(*errno);
            }
            Some(Fault::Short(max)) => buf.len().min(*max),
            None => buf.len(),
        };

        out.extend_from_slice(&buf[..len]);
        trace!("write #{} to fd {}: {} of {} bytes", nth, fd, len, buf.len());
        Ok(len)
    }

    fn read(&mut self, fd: c_int, buf: &mut [u8]) -> Result<usize> {
        self.reads += 1;

        if fd != STDIN {
            return Err(EBADF);
        }

        let len = buf.len().min(self.input.len());
        for (dst, src) in buf.iter_mut().zip(self.input.drain(..len)) {
            *dst = src;
        }
        Ok(len)
    }
}
