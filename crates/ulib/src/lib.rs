// SPDX-License-Identifier: Apache-2.0

//! Syscall surface for user test programs
//!
//! A user program only ever sees a handful of primitives: `write` and `read` on
//! a file descriptor, and the character I/O built on top of them (`getchar`,
//! `puts`, `printf`). This crate models those primitives as the [`Handler`]
//! trait so the same program can run against the host process or against a
//! scripted, in-memory stream.
//!
//! # Descriptor table
//!
//! Programs address streams by small integer file descriptors. The table has
//! [`MAX_OPEN_FILES`] slots; by convention slot [`STDIN`] is standard input and
//! slot [`STDOUT`] is standard output. There is no standard error unless one is
//! configured.
//!
//! # Errors
//!
//! All primitives return [`Result`], whose error is a positive errno value such
//! as [`libc::EBADF`].
//!
//! # Exit status
//!
//! Programs return something implementing [`Termination`], which is reported
//! as an [`ExitCode`].

#![cfg_attr(not(test), no_std)]
#![deny(clippy::all)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

extern crate alloc;
#[cfg(all(feature = "host", not(test)))]
extern crate std;

mod exit;
mod handler;
mod macros;

#[cfg(feature = "host")]
pub mod host;
pub mod scripted;

pub use exit::{ExitCode, Termination};
pub use handler::Handler;

pub use libc;

/// Result of a syscall primitive: the value, or a positive errno.
pub type Result<T> = core::result::Result<T, i32>;

/// Number of slots in a descriptor table
pub const MAX_OPEN_FILES: usize = 16;

/// Descriptor of standard input
pub const STDIN: i32 = 0;

/// Descriptor of standard output
pub const STDOUT: i32 = 1;
