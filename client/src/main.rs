use bevy::{
    app::ScheduleRunnerSettings,
    prelude::{App, MinimalPlugins},
};
use clap::Parser;
use hns_client::{
    config::ClientConfig,
    systems::{ClientLobbyPlugin, ClientNetworkPlugin, NotificationPlugin, RoundPlugin},
    TICK_RATE_HZ,
};
use hns_common::GameState;
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hns-client", about = "Hide and Seek client instance")]
struct Args {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured display name.
    #[arg(long)]
    name: Option<String>,

    /// Override the configured server address.
    #[arg(long)]
    server_addr: Option<SocketAddr>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::load(args.config.as_deref())?;
    if let Some(name) = args.name {
        config.name = name;
    }
    if let Some(server_addr) = args.server_addr {
        config.server_addr = server_addr;
    }

    App::new()
        .insert_resource(ScheduleRunnerSettings::run_loop(Duration::from_millis(
            (1000 / TICK_RATE_HZ) as u64,
        )))
        .add_plugins(MinimalPlugins)
        .insert_resource(config)
        .add_state::<GameState>()
        .add_plugin(ClientNetworkPlugin)
        .add_plugin(ClientLobbyPlugin)
        .add_plugin(RoundPlugin)
        .add_plugin(NotificationPlugin)
        .run();

    Ok(())
}
