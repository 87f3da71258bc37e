// SPDX-License-Identifier: Apache-2.0

//! Prompts for lines and echoes them until a line holding just `.` arrives.

use crate::Program;

use log::{debug, trace};
use ulib::{ExitCode, Handler, Result, Termination};
use userprog_config::{Config, Write4};

/// A line that ends the loop
const TERMINATOR: &[u8] = b".";

/// The `write4` program
pub struct EchoLoop;

impl Program for EchoLoop {
    fn name(&self) -> &'static str {
        "write4"
    }

    fn description(&self) -> &'static str {
        "echo input lines after a prompt until a line holding just '.'"
    }

    fn run(&self, handler: &mut dyn Handler, config: &Config) -> ExitCode {
        main(handler, &config.write4).report()
    }
}

/// What [`read_line`] stopped at
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum End {
    /// A newline, stored as the last byte
    Newline,

    /// The buffer filled up first
    Full,

    /// Standard input ended
    Eof,
}

/// Reads bytes from standard input into `buffer` until a newline, a full
/// buffer or end of input.
fn read_line(h: &mut dyn Handler, buffer: &mut [u8]) -> Result<(usize, End)> {
    let mut len = 0;

    while len < buffer.len() {
        match h.getchar()? {
            None => return Ok((len, End::Eof)),
            Some(c) => {
                buffer[len] = c;
                len += 1;
                if c == b'\n' {
                    return Ok((len, End::Newline));
                }
            }
        }
    }

    Ok((len, End::Full))
}

/// Runs the echo loop.
///
/// Lines hold at most `buffer_size - 1` bytes. A longer line is echoed in
/// pieces without prompting between them, and no piece of it ends the loop.
/// At end of input a pending partial line is handled as if it were complete
/// and the loop ends successfully.
pub fn main(h: &mut dyn Handler, config: &Write4) -> Result<ExitCode> {
    // One slot of the configured size is the terminator's.
    let mut buffer = vec![0u8; config.buffer_size.saturating_sub(1).max(1)];
    let mut continuing = false;

    loop {
        if !continuing {
            h.puts(config.prompt.as_bytes())?;
        }

        let (len, end) = read_line(h, &mut buffer)?;
        let line = &buffer[..len];
        trace!("read {} bytes, stopped at {:?}", len, end);

        let text = line.strip_suffix(b"\n").unwrap_or(line);
        if !continuing && end != End::Full && text == TERMINATOR {
            debug!("terminator seen");
            return Ok(ExitCode::SUCCESS);
        }

        // The previous piece was already terminated by `puts`.
        let newline_only = continuing && line == b"\n";
        if !line.is_empty() && !newline_only {
            h.puts(line)?;
        }

        if end == End::Eof {
            debug!("end of input");
            return Ok(ExitCode::SUCCESS);
        }

        continuing = end == End::Full;
    }
}
