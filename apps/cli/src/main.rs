// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Buildgen CLI - spawn procedural buildings and write them as OBJ.
//!
//! Usage:
//!   buildgen [--mode many|big|small] [--seed N] [--output FILE] [--no-batch] [--summary]
//!
//! `BUILDGEN_MODE`, `BUILDGEN_SEED` and `BUILDGEN_OUTPUT` provide defaults;
//! `RUST_LOG` controls logging (default `info`).

use anyhow::{Context, Result};
use buildgen_building::{destroy_all, BuildingFactory, BuildingSummary, SceneGraph};
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing_subscriber::EnvFilter;

mod config;
mod obj;

use config::CliConfig;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(config) = CliConfig::from_env().with_args(&args)? else {
        print_usage();
        return Ok(());
    };

    tracing::info!(
        mode = %config.mode,
        seed = config.seed,
        output = %config.output,
        batch = config.batch,
        "Starting building generation"
    );

    let mut scene = SceneGraph::with_default_materials();
    let mut factory = BuildingFactory::new(config.seed);
    let mut buildings = factory
        .spawn(config.mode, &mut scene, config.batch)
        .context("failed to spawn buildings")?;

    let meshes = scene.world_meshes();
    let file = File::create(&config.output)
        .with_context(|| format!("cannot create output file '{}'", config.output))?;
    let mut writer = BufWriter::new(file);
    obj::write_obj(&mut writer, &meshes)
        .and_then(|()| writer.flush())
        .with_context(|| format!("cannot write '{}'", config.output))?;

    let vertices: usize = meshes.iter().map(|(_, m)| m.vertex_count()).sum();
    let triangles: usize = meshes.iter().map(|(_, m)| m.triangle_count()).sum();
    tracing::info!(
        buildings = buildings.len(),
        meshes = meshes.len(),
        vertices,
        triangles,
        "Wrote {}",
        config.output
    );

    if config.summary {
        let summaries = buildings
            .iter()
            .map(|b| b.summary())
            .collect::<buildgen_building::Result<Vec<BuildingSummary>>>()?;
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    }

    destroy_all(&mut buildings, &mut scene);
    Ok(())
}

fn print_usage() {
    println!("Usage: buildgen [options]");
    println!();
    println!("Options:");
    println!("  --mode <many|big|small>  Density mode (default: small, env BUILDGEN_MODE)");
    println!("  --seed <N>               Footprint jitter seed (default: 42, env BUILDGEN_SEED)");
    println!("  --output, -o <FILE>      OBJ output path (default: buildings.obj, env BUILDGEN_OUTPUT)");
    println!("  --no-batch               Keep one mesh per window frame and pane");
    println!("  --summary                Print a JSON summary of every building");
    println!("  --help, -h               Show this help");
}
