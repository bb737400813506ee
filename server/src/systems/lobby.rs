use crate::{
    components::ServerPlayerBundle,
    config::ServerConfig,
    events::{NewPlayer, OutgoingPacket},
    resources::AddrToPlayer,
    systems::{labels, PacketDestination},
    MAX_PLAYERS,
};
use bevy::{
    ecs::event::Events,
    prelude::{
        App, Commands, EventWriter, IntoSystemAppConfig, IntoSystemConfig, NextState, OnEnter,
        OnUpdate, Plugin, Query, Res, ResMut, Resource,
    },
};
use hns_common::{
    components::player::{PlayerId, PlayerName, PlayerNetworkAddr},
    network::{
        ConnectAckPacket, DeliveryType, FullGameStatePacket, LobbyTickPacket, NewPlayerPacket,
        ServerToClient, GAME_VERSION, LOBBY_STREAM,
    },
    resources::PlayerToEntity,
    GameState,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    time::{Duration, Instant},
};
use tracing::{info, warn};

pub struct LobbyPlugin;

impl Plugin for LobbyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LobbyTimer>()
            .add_system(setup_lobby.in_schedule(OnEnter(GameState::Lobby)))
            .add_system(
                handle_new_players
                    .in_set(labels::Lobby)
                    .in_set(OnUpdate(GameState::Lobby))
                    .after(labels::NetworkSystem::Receive),
            )
            .add_system(
                update_lobby
                    .in_set(labels::Lobby)
                    .in_set(OnUpdate(GameState::Lobby))
                    .after(handle_new_players),
            )
            .add_system(
                reject_latecomers
                    .in_set(labels::Lobby)
                    .in_set(OnUpdate(GameState::RoundActive))
                    .after(labels::NetworkSystem::Receive),
            );
    }
}

#[derive(Debug, Resource)]
struct LobbyTimer {
    opened_at: Instant,
    last_broadcast_secs: Option<u64>,
}

impl Default for LobbyTimer {
    fn default() -> Self {
        Self { opened_at: Instant::now(), last_broadcast_secs: None }
    }
}

fn setup_lobby(mut lobby_timer: ResMut<LobbyTimer>) {
    info!("Lobby open");

    *lobby_timer = LobbyTimer::default();
}

fn handle_new_players(
    mut commands: Commands,
    mut new_players: ResMut<Events<NewPlayer>>,
    mut players: ResMut<AddrToPlayer>,
    mut player_to_entity: ResMut<PlayerToEntity>,
    existing_players: Query<(&PlayerId, &PlayerName)>,
    mut outgoing_tx: EventWriter<OutgoingPacket>,
) {
    // Entities spawned this frame aren't queryable yet, so joins from the
    // same frame are tracked here to keep full-state packets complete.
    let mut joined_this_frame: Vec<NewPlayerPacket> = Vec::new();

    for new_player in new_players.drain() {
        let connect_packet = new_player.connect_packet;

        if connect_packet.version != GAME_VERSION {
            warn!(
                "Rejecting {} ({}), game version mismatch: {} != {}",
                connect_packet.name, new_player.addr, connect_packet.version, GAME_VERSION
            );
            continue;
        }

        if players.0.contains_key(&new_player.addr) {
            warn!("{} connected twice, ignoring", new_player.addr);
            continue;
        }

        if players.0.len() >= MAX_PLAYERS {
            warn!("Rejecting {} ({}), lobby is full", connect_packet.name, new_player.addr);
            continue;
        }

        // The lobby-full check above caps the head count, so a free id
        // always exists in range. Ids freed by disconnects get reused.
        let Some(player_id) = next_free_player_id(&players.0) else {
            warn!("Rejecting {} ({}), no free player id", connect_packet.name, new_player.addr);
            continue;
        };

        info!("{} joined as player {} ({})", connect_packet.name, player_id, new_player.addr);

        // Everyone already here, plus the new player themselves, make up
        // the full state sent back to the new connection.
        let mut state_players: Vec<NewPlayerPacket> = existing_players
            .iter()
            .map(|(id, name)| NewPlayerPacket::new(name.0.clone(), id.0))
            .collect();
        state_players.extend(joined_this_frame.iter().cloned());
        state_players.push(NewPlayerPacket::new(connect_packet.name.clone(), player_id.0));
        joined_this_frame.push(NewPlayerPacket::new(connect_packet.name.clone(), player_id.0));

        let entity = commands
            .spawn(ServerPlayerBundle {
                id: player_id,
                name: PlayerName(connect_packet.name.clone()),
                network_addr: PlayerNetworkAddr(new_player.addr),
            })
            .id();

        players.0.insert(new_player.addr, player_id);
        player_to_entity.0.insert(player_id, entity);

        outgoing_tx.send(OutgoingPacket::new(
            PacketDestination::Single(new_player.addr),
            ServerToClient::ConnectAck(ConnectAckPacket::new(player_id.0)),
            DeliveryType::ReliableOrdered,
            Some(LOBBY_STREAM),
        ));

        outgoing_tx.send(OutgoingPacket::new(
            PacketDestination::Single(new_player.addr),
            ServerToClient::FullGameState(FullGameStatePacket::new(state_players)),
            DeliveryType::ReliableOrdered,
            Some(LOBBY_STREAM),
        ));

        let other_addrs: Vec<_> =
            players.0.keys().filter(|addr| **addr != new_player.addr).copied().collect();

        outgoing_tx.send(OutgoingPacket::new(
            PacketDestination::BroadcastToSet(other_addrs),
            ServerToClient::NewPlayer(NewPlayerPacket::new(connect_packet.name, player_id.0)),
            DeliveryType::ReliableOrdered,
            Some(LOBBY_STREAM),
        ));
    }
}

fn next_free_player_id(players: &HashMap<SocketAddr, PlayerId>) -> Option<PlayerId> {
    (0..MAX_PLAYERS as u8).map(PlayerId).find(|id| !players.values().any(|used| used == id))
}

/// Once a round is running the lobby is closed, but connect attempts keep
/// feeding the queue. The queue is manually managed, so this drain is its
/// only cleanup outside the lobby.
fn reject_latecomers(mut new_players: ResMut<Events<NewPlayer>>) {
    for new_player in new_players.drain() {
        warn!(
            "Rejecting {} ({}), the round is already running",
            new_player.connect_packet.name, new_player.addr
        );
    }
}

fn update_lobby(
    config: Res<ServerConfig>,
    mut lobby_timer: ResMut<LobbyTimer>,
    players: Query<&PlayerId>,
    mut game_state: ResMut<NextState<GameState>>,
    mut outgoing_tx: EventWriter<OutgoingPacket>,
) {
    let countdown = Duration::from_secs(config.lobby_countdown_secs);
    let elapsed = lobby_timer.opened_at.elapsed();
    let seconds_remaining = countdown.saturating_sub(elapsed).as_secs();

    if lobby_timer.last_broadcast_secs != Some(seconds_remaining) {
        lobby_timer.last_broadcast_secs = Some(seconds_remaining);

        outgoing_tx.send(OutgoingPacket::new(
            PacketDestination::BroadcastToAll,
            ServerToClient::LobbyTick(LobbyTickPacket::new(seconds_remaining)),
            DeliveryType::ReliableSequenced,
            Some(LOBBY_STREAM),
        ));
    }

    // The round needs at least one player; the countdown keeps running
    // until somebody joins.
    if elapsed >= countdown && !players.is_empty() {
        info!("Lobby countdown finished, starting the round");
        game_state.set(GameState::RoundActive);
    }
}
