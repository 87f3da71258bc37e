// SPDX-License-Identifier: Apache-2.0

//! User test programs
//!
//! Each program exercises the syscall surface of [`ulib::Handler`] and reports
//! an [`ExitCode`]. Programs are looked up by name in [`PROGRAMS`].

#![deny(clippy::all)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod write1;
pub mod write4;

use once_cell::sync::Lazy;
use ulib::{ExitCode, Handler};
use userprog_config::Config;

/// A user test program
pub trait Program: Sync + Send {
    /// The name the program is started by
    fn name(&self) -> &'static str;

    /// One line describing what the program does
    fn description(&self) -> &'static str;

    /// Runs the program to completion against `handler`.
    fn run(&self, handler: &mut dyn Handler, config: &Config) -> ExitCode;
}

/// All known programs, in listing order
pub static PROGRAMS: Lazy<Vec<Box<dyn Program>>> = Lazy::new(|| {
    vec![
        Box::new(write1::ByteWriter),
        Box::new(write4::EchoLoop),
    ]
});

/// Looks up a program by name.
pub fn find(name: &str) -> Option<&'static dyn Program> {
    PROGRAMS.iter().find(|p| p.name() == name).map(|p| &**p)
}
