// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{anyhow, Context};
use std::env;
use switchyard::config::load_and_validate_config;
use switchyard::observability::init_tracing;
use switchyard::router::Router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let [_, path] = args.as_slice() else {
        let program = args.first().map_or("switchyard", String::as_str);
        eprintln!("Usage: {} <topology.yaml|topology.toml>", program);
        eprintln!("Example: {} configs/pipeline.yaml", program);
        std::process::exit(1);
    };

    let topology = load_and_validate_config(path).map_err(|e| anyhow!(e))?;
    let router = Router::from_config(&topology)
        .with_context(|| format!("failed to build topology from '{}'", path))?;

    router.start().await.context("failed to start topology")?;
    tracing::info!("Topology running, press Ctrl-C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    router.stop().await.context("topology did not stop cleanly")?;
    Ok(())
}
