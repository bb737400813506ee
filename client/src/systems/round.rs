use crate::{
    components::Hidden,
    resources::{AvatarOverride, LocalPlayer, Mortality},
    systems::labels,
};
use bevy::prelude::{
    App, Commands, Entity, EventReader, EventWriter, IntoSystemConfig, NextState, Plugin, Query,
    Res, ResMut, Resource,
};
use hns_common::{
    components::player::{PlayerId, PlayerName},
    metadata::{parse_bool, MetadataKey, MetadataStore},
    network::{GameEvent, GameEventPacket, MetadataChangedPacket},
    notification::Notification,
    GameState, PlayerRole,
};
use tracing::{debug, error, warn};

/// The round controller's client half: mirrors replicated metadata and
/// applies the local round effects when the start trigger arrives.
pub struct RoundPlugin;

impl Plugin for RoundPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MetadataStore>()
            .init_resource::<LocalPlayer>()
            .init_resource::<PendingGameEvents>()
            .init_resource::<AvatarOverride>()
            .init_resource::<Mortality>()
            .add_system(
                handle_metadata_changes
                    .in_set(labels::Round)
                    .after(labels::NetworkSystem::Receive),
            )
            .add_system(
                handle_game_events
                    .in_set(labels::Round)
                    .after(handle_metadata_changes),
            );
    }
}

/// Applies change notifications to the local mirror and reacts to `Found`
/// flips. Unknown keys and malformed values are logged and change nothing.
fn handle_metadata_changes(
    mut changes: EventReader<MetadataChangedPacket>,
    mut store: ResMut<MetadataStore>,
    local_player: Res<LocalPlayer>,
    players: Query<(&PlayerId, &PlayerName)>,
    mut notification_tx: EventWriter<Notification>,
) {
    for change in changes.iter() {
        let key = match change.key.parse::<MetadataKey>() {
            Ok(key) => key,
            Err(err) => {
                error!("Ignoring metadata change: {}", err);
                continue;
            },
        };

        match key {
            MetadataKey::Found(player_id) => {
                let was_found = match parse_bool(&change.value) {
                    Ok(was_found) => was_found,
                    Err(err) => {
                        error!("Ignoring metadata change for {}: {}", key, err);
                        continue;
                    },
                };

                store.set_bool(key, was_found);

                if !was_found {
                    continue;
                }

                // Our own discovery is not news to us.
                if local_player.0 == Some(player_id) {
                    continue;
                }

                let display_name = players
                    .iter()
                    .find(|(id, _)| **id == player_id)
                    .map(|(_, name)| name.0.clone())
                    .unwrap_or_else(|| format!("Player {player_id}"));

                notification_tx
                    .send(Notification::warning("Player Found!", format!("{display_name} was found!")));
            },
            MetadataKey::Seeker(_) | MetadataKey::ForceOverrideAvatars => {
                match parse_bool(&change.value) {
                    Ok(value) => store.set_bool(key, value),
                    Err(err) => error!("Ignoring metadata change for {}: {}", key, err),
                }
            },
            MetadataKey::HiderOverrideAvatar | MetadataKey::SeekerOverrideAvatar => {
                store.set(key, change.value.clone());
            },
        }
    }
}

/// Triggers received before the server acknowledged us, held until our
/// own id is known.
#[derive(Debug, Default, Resource)]
struct PendingGameEvents(Vec<GameEvent>);

/// Reacts to broadcast triggers. Unknown event names are logged and
/// change nothing.
fn handle_game_events(
    mut commands: Commands,
    mut game_events: EventReader<GameEventPacket>,
    mut pending: ResMut<PendingGameEvents>,
    store: Res<MetadataStore>,
    local_player: Res<LocalPlayer>,
    players: Query<(Entity, &PlayerId)>,
    mut avatar_override: ResMut<AvatarOverride>,
    mut mortality: ResMut<Mortality>,
    mut notification_tx: EventWriter<Notification>,
    mut game_state: ResMut<NextState<GameState>>,
) {
    for packet in game_events.iter() {
        match packet.name.parse::<GameEvent>() {
            Ok(event) => pending.0.push(event),
            Err(err) => error!("Ignoring game event: {}", err),
        }
    }

    // The connect ack travels on a different stream than the triggers, so
    // a trigger can arrive first. Hold it until the ack lands.
    let Some(local_id) = local_player.0 else {
        if !pending.0.is_empty() {
            debug!("Holding {} trigger(s) until the server acknowledges us", pending.0.len());
        }
        return;
    };

    for event in pending.0.drain(..) {
        match event {
            GameEvent::RoundStarted => {
                let role = match store.get_bool(MetadataKey::Seeker(local_id)) {
                    Ok(is_seeker) => PlayerRole::from_seeker_flag(is_seeker),
                    Err(err) => {
                        error!("Ignoring round start, seeker flag is unreadable: {}", err);
                        continue;
                    },
                };

                if role.is_seeker() {
                    for (entity, player_id) in players.iter() {
                        if *player_id != local_id {
                            commands.entity(entity).insert(Hidden);
                        }
                    }
                }

                apply_avatar_override(&store, role, &mut avatar_override);

                let message = match role {
                    PlayerRole::Seeker => "You are a seeker!",
                    PlayerRole::Hider => "You are a hider!",
                };
                notification_tx.send(Notification::info("Round Begin!", message));

                // Seekers can't die, hiders can.
                mortality.0 = !role.is_seeker();

                game_state.set(GameState::RoundActive);
            },
        }
    }
}

fn apply_avatar_override(
    store: &MetadataStore,
    role: PlayerRole,
    avatar_override: &mut AvatarOverride,
) {
    let force_override = match store.get_bool(MetadataKey::ForceOverrideAvatars) {
        Ok(force_override) => force_override,
        Err(err) => {
            error!("Skipping avatar override: {}", err);
            return;
        },
    };

    if !force_override {
        return;
    }

    let avatar_key = match role {
        PlayerRole::Seeker => MetadataKey::SeekerOverrideAvatar,
        PlayerRole::Hider => MetadataKey::HiderOverrideAvatar,
    };

    match store.get(avatar_key) {
        Some(barcode) => avatar_override.0 = Some(barcode.to_string()),
        None => warn!("Avatar overrides are forced but {} is unset", avatar_key),
    }
}
