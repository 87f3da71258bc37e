// SPDX-License-Identifier: Apache-2.0

//! Configuration for running user test programs
//!
//! The configuration describes the descriptor table a program starts with and
//! the parameters of each program. It is usually read from a `Userprog.toml`
//! file; every section is optional and the defaults reproduce the stock
//! programs.
//!
//! ```
//! use userprog_config::{Config, File};
//!
//! const CONFIG: &str = r#"
//! [write4]
//! prompt = "$ "
//!
//! [[files]]
//! kind = "stdin"
//!
//! [[files]]
//! kind = "stdout"
//! "#;
//!
//! let config: Config = CONFIG.parse().unwrap();
//! assert_eq!(config.write4.prompt, "$ ");
//! assert_eq!(config.files[1], File::Stdout { name: None });
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(rust_2018_idioms)]

use std::fmt::{self, Display, Formatter};
use std::ops::Deref;
use std::path::Path;
use std::str::FromStr;

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

/// Default name of the configuration file
pub const CONFIG_FILE: &str = "Userprog.toml";

/// Maximum number of pre-opened file descriptors
pub const MAX_FILES: usize = 16;

/// Message written by `write1` unless configured otherwise
pub const WRITE1_MESSAGE: &str =
    "\nroses are red\nviolets are blue\nI love Nachos\nand so do you\n\n";

/// Descriptor `write1` writes to unless configured otherwise
pub const WRITE1_FD: i32 = 1;

/// Prompt printed by `write4` unless configured otherwise
pub const WRITE4_PROMPT: &str = "-> ";

/// Size of the `write4` line buffer, terminator included, unless configured
/// otherwise
pub const WRITE4_BUFFER_SIZE: usize = 80;

/// Smallest `write4` buffer that fits `.`, its newline and the terminator
pub const WRITE4_MIN_BUFFER_SIZE: usize = 3;

/// Configuration file template
pub const CONFIG_TEMPLATE: &str = r#"## Configuration for the user test programs

## Byte-at-a-time writer
# [write1]
# message = "\nroses are red\nviolets are blue\nI love Nachos\nand so do you\n\n"
# fd = 1

## Echo loop
# [write4]
# prompt = "-> "
# buffer_size = 80

## Pre-opened file descriptors, numbered from 0 in order
[[files]]
kind = "stdin"

[[files]]
kind = "stdout"

## A descriptor discarding everything written to it
# [[files]]
# name = "sink"
# kind = "null"
"#;

/// Configuration error
#[derive(Debug)]
pub enum Error {
    /// The file could not be read
    Io(std::io::Error),

    /// The contents are not a valid configuration
    Parse(toml::de::Error),

    /// More files than descriptor slots
    TooManyFiles(usize),

    /// `write4.buffer_size` cannot hold `.` and a newline besides the
    /// terminator
    BufferTooSmall(usize),

    /// `write4.prompt` is empty
    EmptyPrompt,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read configuration: {}", e),
            Self::Parse(e) => write!(f, "invalid configuration: {}", e),
            Self::TooManyFiles(n) => write!(
                f,
                "{} files configured, at most {} descriptors are available",
                n, MAX_FILES
            ),
            Self::BufferTooSmall(n) => write!(
                f,
                "`write4.buffer_size` must be at least {}, got {}",
                WRITE4_MIN_BUFFER_SIZE, n
            ),
            Self::EmptyPrompt => write!(f, "`write4.prompt` must not be empty"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Name assigned to a file descriptor
///
/// Names show up in log output when the descriptor table is set up.
pub struct FileName(String);

impl From<String> for FileName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for FileName {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl Deref for FileName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for FileName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;

        if name.contains(':') {
            return Err(D::Error::custom("invalid value for `name` contains ':'"));
        }

        Ok(Self(name))
    }
}

/// The configuration for running user test programs
///
/// The field order matters: TOML requires the array of tables to be
/// serialized last.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Parameters of the byte-at-a-time writer
    #[serde(default)]
    pub write1: Write1,

    /// Parameters of the echo loop
    #[serde(default)]
    pub write4: Write4,

    /// The array of pre-opened file descriptors, starting at descriptor 0
    #[serde(default = "default_files")]
    pub files: Vec<File>,
}

fn default_files() -> Vec<File> {
    vec![File::Stdin { name: None }, File::Stdout { name: None }]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            write1: Write1::default(),
            write4: Write4::default(),
            files: default_files(),
        }
    }
}

impl Config {
    /// Reads and validates the configuration at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        std::fs::read_to_string(path)?.parse()
    }

    /// Checks the constraints the type system cannot express.
    pub fn validate(&self) -> Result<(), Error> {
        if self.files.len() > MAX_FILES {
            return Err(Error::TooManyFiles(self.files.len()));
        }

        if self.write4.buffer_size < WRITE4_MIN_BUFFER_SIZE {
            return Err(Error::BufferTooSmall(self.write4.buffer_size));
        }

        if self.write4.prompt.is_empty() {
            return Err(Error::EmptyPrompt);
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

/// Parameters of the byte-at-a-time writer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Write1 {
    /// The bytes to write, one per syscall
    pub message: String,

    /// The descriptor to write to
    pub fd: i32,
}

impl Default for Write1 {
    fn default() -> Self {
        Self {
            message: WRITE1_MESSAGE.into(),
            fd: WRITE1_FD,
        }
    }
}

/// Parameters of the echo loop
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Write4 {
    /// Printed before every line is read
    pub prompt: String,

    /// Size of the line buffer, terminator included
    pub buffer_size: usize,
}

impl Default for Write4 {
    fn default() -> Self {
        Self {
            prompt: WRITE4_PROMPT.into(),
            buffer_size: WRITE4_BUFFER_SIZE,
        }
    }
}

/// Parameters for a pre-opened file descriptor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", deny_unknown_fields)]
pub enum File {
    /// Discards writes, reads as end of input
    #[serde(rename = "null")]
    Null {
        /// Name assigned to the file descriptor
        name: Option<FileName>,
    },

    /// File descriptor of stdin
    #[serde(rename = "stdin")]
    Stdin {
        /// Name assigned to the file descriptor
        name: Option<FileName>,
    },

    /// File descriptor of stdout
    #[serde(rename = "stdout")]
    Stdout {
        /// Name assigned to the file descriptor
        name: Option<FileName>,
    },

    /// File descriptor of stderr
    #[serde(rename = "stderr")]
    Stderr {
        /// Name assigned to the file descriptor
        name: Option<FileName>,
    },
}

impl File {
    /// Get the name for a file descriptor
    pub fn name(&self) -> &str {
        match self {
            Self::Null { name } => name.as_deref().unwrap_or("null"),
            Self::Stdin { name } => name.as_deref().unwrap_or("stdin"),
            Self::Stdout { name } => name.as_deref().unwrap_or("stdout"),
            Self::Stderr { name } => name.as_deref().unwrap_or("stderr"),
        }
    }
}
