use crate::{components::ClientPlayerBundle, resources::LocalPlayer, systems::labels};
use bevy::prelude::{
    App, Commands, EventReader, IntoSystemConfig, Plugin, Query, ResMut,
};
use hns_common::{
    components::player::{PlayerId, PlayerName},
    network::{ConnectAckPacket, FullGameStatePacket, LobbyTickPacket, NewPlayerPacket},
    resources::PlayerToEntity,
};
use tracing::{debug, info};

/// Keeps the local player roster in sync with the lobby packets.
pub struct ClientLobbyPlugin;

impl Plugin for ClientLobbyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LocalPlayer>()
            .init_resource::<PlayerToEntity>()
            .add_system(
                handle_connect_ack
                    .in_set(labels::Lobby)
                    .after(labels::NetworkSystem::Receive),
            )
            .add_system(
                handle_new_players
                    .in_set(labels::Lobby)
                    .after(labels::NetworkSystem::Receive),
            )
            .add_system(
                handle_full_game_state
                    .in_set(labels::Lobby)
                    .after(labels::NetworkSystem::Receive),
            )
            .add_system(
                handle_lobby_ticks
                    .in_set(labels::Lobby)
                    .after(labels::NetworkSystem::Receive),
            );
    }
}

fn handle_connect_ack(
    mut connect_acks: EventReader<ConnectAckPacket>,
    mut local_player: ResMut<LocalPlayer>,
) {
    for ack in connect_acks.iter() {
        local_player.0 = Some(PlayerId(ack.id));
    }
}

fn handle_new_players(
    mut commands: Commands,
    mut new_players: EventReader<NewPlayerPacket>,
    mut player_to_entity: ResMut<PlayerToEntity>,
) {
    for new_player in new_players.iter() {
        info!("New player: {} ({})", new_player.name, new_player.id);

        spawn_player(&mut commands, &mut player_to_entity, new_player);
    }
}

fn handle_full_game_state(
    mut commands: Commands,
    mut full_game_states: EventReader<FullGameStatePacket>,
    mut player_to_entity: ResMut<PlayerToEntity>,
    existing_players: Query<&PlayerId>,
) {
    for state in full_game_states.iter() {
        for player in &state.players {
            if existing_players.iter().any(|id| id.0 == player.id) {
                continue;
            }

            spawn_player(&mut commands, &mut player_to_entity, player);
        }
    }
}

fn handle_lobby_ticks(mut lobby_ticks: EventReader<LobbyTickPacket>) {
    for tick in lobby_ticks.iter() {
        debug!("Lobby tick, {}s remaining", tick.seconds_remaining);
    }
}

fn spawn_player(
    commands: &mut Commands,
    player_to_entity: &mut PlayerToEntity,
    player: &NewPlayerPacket,
) {
    let player_id = PlayerId(player.id);

    let entity = commands
        .spawn(ClientPlayerBundle { id: player_id, name: PlayerName(player.name.clone()) })
        .id();

    player_to_entity.0.insert(player_id, entity);
}
