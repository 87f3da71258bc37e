// SPDX-License-Identifier: Apache-2.0

use std::process::ExitCode;

use clap::Args;
use usertests::PROGRAMS;

/// List the available programs
#[derive(Args, Debug)]
pub struct Options;

impl Options {
    pub fn execute(self) -> anyhow::Result<ExitCode> {
        let width = PROGRAMS.iter().map(|p| p.name().len()).max().unwrap_or(0);

        for program in PROGRAMS.iter() {
            println!("{:width$}  {}", program.name(), program.description());
        }

        Ok(ExitCode::SUCCESS)
    }
}
