// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables, overridden by flags.

use anyhow::{anyhow, bail, Context, Result};
use buildgen_building::{DensityMode, DEFAULT_SEED};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Which buildings to spawn.
    pub mode: DensityMode,
    /// Seed of the footprint jitter.
    pub seed: u64,
    /// OBJ file to write.
    pub output: String,
    /// Merge frames and glass into one mesh each.
    pub batch: bool,
    /// Print a JSON summary of every building to stdout.
    pub summary: bool,
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            mode: std::env::var("BUILDGEN_MODE")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(DensityMode::Small),
            seed: std::env::var("BUILDGEN_SEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SEED),
            output: std::env::var("BUILDGEN_OUTPUT").unwrap_or_else(|_| "buildings.obj".into()),
            batch: true,
            summary: false,
        }
    }

    /// Apply command-line flags on top of this configuration.
    ///
    /// Returns `None` when help was requested.
    pub fn with_args(mut self, args: &[String]) -> Result<Option<Self>> {
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--help" | "-h" => return Ok(None),
                "--mode" => {
                    let value = flag_value(args, &mut i, "--mode")?;
                    self.mode = value
                        .parse()
                        .map_err(|e| anyhow!("invalid --mode '{value}': {e}"))?;
                }
                "--seed" => {
                    let value = flag_value(args, &mut i, "--seed")?;
                    self.seed = value
                        .parse()
                        .with_context(|| format!("invalid --seed '{value}'"))?;
                }
                "--output" | "-o" => {
                    self.output = flag_value(args, &mut i, "--output")?.to_string();
                }
                "--no-batch" => self.batch = false,
                "--summary" => self.summary = true,
                other => bail!("unknown option: {other}"),
            }
            i += 1;
        }
        Ok(Some(self))
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn flag_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{flag} needs a value"))
}
