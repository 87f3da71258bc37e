// SPDX-License-Identifier: Apache-2.0

use core::fmt::Debug;

use log::error;

/// Termination
pub trait Termination {
    /// Is called to get the representation of the value as status code.
    /// This status code is returned to the operating system.
    fn report(self) -> ExitCode;
}

impl Termination for () {
    #[inline]
    fn report(self) -> ExitCode {
        ExitCode::SUCCESS.report()
    }
}

impl Termination for ExitCode {
    #[inline]
    fn report(self) -> ExitCode {
        self
    }
}

impl<T: Termination, E: Debug> Termination for core::result::Result<T, E> {
    fn report(self) -> ExitCode {
        match self {
            Ok(val) => val.report(),
            Err(err) => {
                error!("Error: {:?}", err);
                ExitCode::FAILURE.report()
            }
        }
    }
}

/// The status a program hands back to whoever started it
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Normal termination
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Generic failure
    pub const FAILURE: ExitCode = ExitCode(1);
}

impl ExitCode {
    /// The raw status value, which may be negative.
    #[inline]
    pub fn to_i32(self) -> i32 {
        self.0
    }

    /// The status as a host process observes it, i.e. truncated to the low
    /// eight bits.
    #[inline]
    pub fn to_host(self) -> u8 {
        self.0 as u8
    }

    /// Whether this is [`ExitCode::SUCCESS`].
    #[inline]
    pub fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl From<i32> for ExitCode {
    /// Construct an exit code from an arbitrary status, e.g. `exit(-1)`.
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<u8> for ExitCode {
    /// Construct an exit code from an arbitrary u8 value.
    fn from(code: u8) -> Self {
        ExitCode(code as _)
    }
}
