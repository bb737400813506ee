use bevy::{
    app::ScheduleRunnerSettings,
    prelude::{App, MinimalPlugins},
};
use clap::Parser;
use hns_common::GameState;
use hns_server::{
    config::ServerConfig,
    systems::{LobbyPlugin, ReplicationPlugin, RoundPlugin, ServerNetworkPlugin},
    TICK_RATE_HZ,
};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hns-server", about = "Hide and Seek authoritative server")]
struct Args {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(long)]
    bind_addr: Option<SocketAddr>,

    /// Override the configured seeker count.
    #[arg(long)]
    seeker_count: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(bind_addr) = args.bind_addr {
        config.bind_addr = bind_addr;
    }
    if let Some(seeker_count) = args.seeker_count {
        config.seeker_count = seeker_count;
    }

    App::new()
        .insert_resource(ScheduleRunnerSettings::run_loop(Duration::from_millis(
            (1000 / TICK_RATE_HZ) as u64,
        )))
        .add_plugins(MinimalPlugins)
        .insert_resource(config)
        .add_state::<GameState>()
        .add_plugin(ServerNetworkPlugin)
        .add_plugin(LobbyPlugin)
        .add_plugin(RoundPlugin)
        .add_plugin(ReplicationPlugin)
        .run();

    Ok(())
}
