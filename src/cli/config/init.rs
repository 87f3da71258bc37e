// SPDX-License-Identifier: Apache-2.0

use std::fs::OpenOptions;
use std::io::prelude::*;
use std::path::Path;
use std::process::ExitCode;

use anyhow::bail;
use clap::Args;
use log::info;
use userprog_config::{CONFIG_FILE, CONFIG_TEMPLATE};

/// Generate a `Userprog.toml` template
#[derive(Args, Debug)]
pub struct Options;

impl Options {
    pub fn execute(self) -> anyhow::Result<ExitCode> {
        let config_path = Path::new(CONFIG_FILE);
        if config_path.exists() {
            bail!("{config_path:?} does already exist.");
        }

        let mut config_file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(config_path)?;

        config_file.write_all(CONFIG_TEMPLATE.as_bytes())?;
        info!("wrote {config_path:?}");
        Ok(ExitCode::SUCCESS)
    }
}
