// SPDX-License-Identifier: Apache-2.0

use crate::libc::{c_int, EIO};
use crate::{Result, STDIN, STDOUT};

use core::fmt;

/// Syscall handler seen by a user program.
///
/// Implementors supply the two raw primitives, [`write`](Handler::write) and
/// [`read`](Handler::read). The character I/O every program uses is provided
/// on top of them.
pub trait Handler {
    /// Writes up to `buf.len()` bytes to `fd`.
    ///
    /// Returns the number of bytes transferred, which may be short.
    fn write(&mut self, fd: c_int, buf: &[u8]) -> Result<usize>;

    /// Reads up to `buf.len()` bytes from `fd`.
    ///
    /// Returns the number of bytes transferred; `0` means end of input.
    fn read(&mut self, fd: c_int, buf: &mut [u8]) -> Result<usize>;

    /// Writes all of `buf` to `fd`, resuming after short writes.
    ///
    /// A write that transfers nothing fails with `EIO`.
    fn write_all(&mut self, fd: c_int, mut buf: &[u8]) -> Result<()> {
        while !buf.is_empty() {
            match self.write(fd, buf)? {
                0 => return Err(EIO),
                n => buf = &buf[n.min(buf.len())..],
            }
        }
        Ok(())
    }

    /// Reads the next byte of standard input, `None` at end of input.
    fn getchar(&mut self) -> Result<Option<u8>> {
        let mut c = [0u8; 1];
        match self.read(STDIN, &mut c)? {
            0 => Ok(None),
            _ => Ok(Some(c[0])),
        }
    }

    /// Writes a line to standard output.
    ///
    /// A newline is appended unless `s` already ends with one.
    fn puts(&mut self, s: &[u8]) -> Result<()> {
        self.write_all(STDOUT, s)?;
        if s.last() != Some(&b'\n') {
            self.write_all(STDOUT, b"\n")?;
        }
        Ok(())
    }

    /// Writes formatted output to standard output.
    ///
    /// This is the backend of the [`printf!`](crate::printf) macro. Output
    /// stops at the first failed write and its errno is returned.
    fn print_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        let mut out = Stdout {
            handler: self,
            errno: None,
        };

        match fmt::write(&mut out, args) {
            Ok(()) => Ok(()),
            Err(fmt::Error) => Err(out.errno.unwrap_or(EIO)),
        }
    }
}

impl<H: Handler + ?Sized> Handler for &mut H {
    #[inline]
    fn write(&mut self, fd: c_int, buf: &[u8]) -> Result<usize> {
        (**self).write(fd, buf)
    }

    #[inline]
    fn read(&mut self, fd: c_int, buf: &mut [u8]) -> Result<usize> {
        (**self).read(fd, buf)
    }
}

struct Stdout<'a, H: ?Sized> {
    handler: &'a mut H,
    errno: Option<i32>,
}

impl<H: Handler + ?Sized> fmt::Write for Stdout<'_, H> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.handler.write_all(STDOUT, s.as_bytes()).map_err(|e| {
            self.errno = Some(e);
            fmt::Error
        })
    }
}
