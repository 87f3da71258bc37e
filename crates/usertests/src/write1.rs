// SPDX-License-Identifier: Apache-2.0

//! Writes a message one byte per `write` syscall.

use crate::Program;

use core::slice;

use log::{debug, warn};
use ulib::{printf, ExitCode, Handler};
use userprog_config::{Config, Write1};

/// Status reported when a write does not transfer exactly one byte
pub const WRITE_FAILED: i32 = -1;

/// The `write1` program
pub struct ByteWriter;

impl Program for ByteWriter {
    fn name(&self) -> &'static str {
        "write1"
    }

    fn description(&self) -> &'static str {
        "write a fixed message one byte per write syscall"
    }

    fn run(&self, handler: &mut dyn Handler, config: &Config) -> ExitCode {
        main(handler, &config.write1)
    }
}

/// Writes every byte of the message to the configured descriptor.
///
/// Stops at the first write that does not report exactly one byte, prints a
/// diagnostic with the returned value (`-1` for an error) and exits with
/// [`WRITE_FAILED`].
pub fn main(h: &mut dyn Handler, config: &Write1) -> ExitCode {
    for (i, c) in config.message.as_bytes().iter().enumerate() {
        let r = match h.write(config.fd, slice::from_ref(c)) {
            Ok(n) => n as isize,
            Err(errno) => {
                debug!("write of byte {} failed with errno {}", i, errno);
                -1
            }
        };

        if r != 1 {
            if let Err(errno) = printf!(h, "failed to write character (r = {})\n", r) {
                warn!("diagnostic lost: errno {}", errno);
            }
            return ExitCode::from(WRITE_FAILED);
        }
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod test {
    use super::*;
    use ulib::libc::EIO;
    use ulib::scripted::{Fault, Scripted};
    use userprog_config::WRITE1_MESSAGE;

    #[test]
    fn writes_message_bytewise() {
        let mut h = Scripted::new(b"");
        let code = main(&mut h, &Write1::default());

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(h.stdout(), WRITE1_MESSAGE.as_bytes());
        assert_eq!(h.writes(), WRITE1_MESSAGE.len());
    }

    #[test]
    fn short_write() {
        let mut h = Scripted::new(b"");
        h.fault(3, Fault::Short(0));
        let code = main(&mut h, &Write1::default());

        assert_eq!(code.to_i32(), WRITE_FAILED);
        let mut expected = WRITE1_MESSAGE.as_bytes()[..3].to_vec();
        expected.extend_from_slice(b"failed to write character (r = 0)\n");
        assert_eq!(h.stdout(), expected.as_slice());
    }

    #[test]
    fn failed_write() {
        let mut h = Scripted::new(b"");
        h.fault(0, Fault::Errno(EIO));
        let code = main(&mut h, &Write1::default());

        assert_eq!(code, ExitCode::from(-1i32));
        assert_eq!(h.stdout(), b"failed to write character (r = -1)\n");
    }

    #[test]
    fn other_descriptor() {
        let mut h = Scripted::new(b"");
        h.open(3);
        let config = Write1 {
            message: "hi\n".into(),
            fd: 3,
        };

        assert_eq!(main(&mut h, &config), ExitCode::SUCCESS);
        assert_eq!(h.output(3), b"hi\n");
        assert!(h.stdout().is_empty());
    }

    #[test]
    fn closed_descriptor() {
        let mut h = Scripted::new(b"");
        let config = Write1 {
            message: "hi\n".into(),
            fd: 5,
        };

        assert_eq!(main(&mut h, &config).to_host(), 255);
        assert_eq!(h.stdout(), b"failed to write character (r = -1)\n");
    }

    #[test]
    fn empty_message() {
        let mut h = Scripted::new(b"");
        let config = Write1 {
            message: String::new(),
            ..Default::default()
        };

        assert_eq!(main(&mut h, &config), ExitCode::SUCCESS);
        assert_eq!(h.writes(), 0);
    }

    #[test]
    fn through_registry() {
        let mut h = Scripted::new(b"");
        let code = crate::find("write1")
            .unwrap()
            .run(&mut h, &Config::default());

        assert!(code.is_success());
        assert_eq!(h.stdout(), WRITE1_MESSAGE.as_bytes());
    }
}
