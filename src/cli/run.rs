// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::Args;
use log::{debug, info};
use ulib::host::{Host, Slot};
use ulib::libc;
use userprog_config::{Config, File, CONFIG_FILE};

/// Run a user program against the descriptors of this process.
///
/// The program sees the descriptor table from the configuration: by default
/// descriptor 0 is this process' stdin and descriptor 1 its stdout. The exit
/// status of `userprog` is the status the program reported, truncated to
/// eight bits.
#[derive(Args, Debug)]
pub struct Options {
    /// Configuration file (defaults to `Userprog.toml` if present)
    #[clap(long, env = "USERPROG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Name of the program to run (see `userprog list`)
    #[clap(value_name = "PROGRAM")]
    pub program: String,
}

impl Options {
    pub fn execute(self) -> anyhow::Result<ExitCode> {
        let Self { config, program } = self;

        let program = usertests::find(&program)
            .ok_or_else(|| anyhow!("unknown program {:?}", program))?;
        let config = load_config(config.as_deref())?;
        let mut host = descriptor_table(&config.files)?;

        info!("running {}", program.name());
        let code = program.run(&mut host, &config);
        info!("{} exited with status {}", program.name(), code.to_i32());

        Ok(ExitCode::from(code.to_host()))
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => path,
        None if Path::new(CONFIG_FILE).exists() => Path::new(CONFIG_FILE),
        None => {
            debug!("no configuration file, using defaults");
            return Ok(Config::default());
        }
    };

    debug!("loading configuration from {:?}", path);
    Config::load(path).with_context(|| format!("failed to load configuration {:?}", path))
}

/// Opens the configured files in order, starting at descriptor 0.
fn descriptor_table(files: &[File]) -> anyhow::Result<Host> {
    let mut host = Host::new();

    for file in files {
        let slot = match file {
            File::Null { .. } => Slot::Null,
            File::Stdin { .. } => Slot::Fd(libc::STDIN_FILENO),
            File::Stdout { .. } => Slot::Fd(libc::STDOUT_FILENO),
            File::Stderr { .. } => Slot::Fd(libc::STDERR_FILENO),
        };

        let fd = host
            .push(slot)
            .map_err(|errno| anyhow!("cannot open {:?}: errno {}", file.name(), errno))?;
        debug!("fd {} is {:?} ({:?})", fd, file.name(), slot);
    }

    Ok(host)
}

#[cfg(test)]
mod test {
    use super::*;
    use ulib::MAX_OPEN_FILES;
    use userprog_config::MAX_FILES;

    #[test]
    fn default_table() {
        let host = descriptor_table(&Config::default().files).unwrap();
        assert_eq!(host.get(0), Some(Slot::Fd(libc::STDIN_FILENO)));
        assert_eq!(host.get(1), Some(Slot::Fd(libc::STDOUT_FILENO)));
        assert_eq!(host.get(2), None);
    }

    #[test]
    fn ordered_table() {
        let files = vec![
            File::Null { name: None },
            File::Stderr {
                name: Some("err".into()),
            },
        ];
        let host = descriptor_table(&files).unwrap();
        assert_eq!(host.get(0), Some(Slot::Null));
        assert_eq!(host.get(1), Some(Slot::Fd(libc::STDERR_FILENO)));
    }

    #[test]
    fn table_sizes_agree() {
        assert_eq!(MAX_FILES, MAX_OPEN_FILES);

        let files = vec![File::Null { name: None }; MAX_FILES + 1];
        assert!(descriptor_table(&files).is_err());
    }

    #[test]
    fn explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[write4]\nprompt = \"$ \"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.write4.prompt, "$ ");

        let missing = dir.path().join("missing.toml");
        let err = load_config(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("failed to load configuration"));
    }
}
