use crate::{
    config::ServerConfig,
    events::{MetadataWrite, TriggerGameEvent},
    resources::SessionRng,
};
use bevy::{
    ecs::event::Events,
    prelude::{App, EventWriter, IntoSystemAppConfig, OnEnter, Plugin, Query, Res, ResMut},
};
use hns_common::{
    components::player::PlayerId,
    metadata::{MetadataKey, MetadataStore},
    network::GameEvent,
    GameState,
};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use tracing::info;

pub struct RoundPlugin;

impl Plugin for RoundPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MetadataStore>()
            .init_resource::<Events<MetadataWrite>>()
            .init_resource::<Events<TriggerGameEvent>>()
            .insert_resource(SessionRng(rand::rngs::StdRng::from_entropy()))
            .add_system(start_round.in_schedule(OnEnter(GameState::RoundActive)));
    }
}

// There is no transition back to the lobby yet; a round runs until the
// server is restarted. Stop/reset handling is a known gap carried over
// from the original gamemode.
//
// TODO - Nothing flips `Found.<id>` to true yet. The player action
// pipeline (seeker tags a hider -> Found flag write) still needs a
// client-side producer and a server handler feeding `MetadataWrite`.

/// Assigns round roles and announces the round start.
///
/// Every player's seeker flag is reset to false before the new seekers
/// are flagged, so a re-run can never leak roles from the previous round.
fn start_round(
    config: Res<ServerConfig>,
    players: Query<&PlayerId>,
    mut rng: ResMut<SessionRng>,
    mut metadata_tx: EventWriter<MetadataWrite>,
    mut trigger_tx: EventWriter<TriggerGameEvent>,
) {
    let players: Vec<PlayerId> = players.iter().copied().collect();

    for player_id in &players {
        metadata_tx.send(MetadataWrite::flag(MetadataKey::Seeker(*player_id), false));
    }

    let seekers = choose_seekers(&players, config.seeker_count, &mut rng.0);
    for player_id in &seekers {
        metadata_tx.send(MetadataWrite::flag(MetadataKey::Seeker(*player_id), true));
    }

    metadata_tx.send(MetadataWrite::flag(
        MetadataKey::ForceOverrideAvatars,
        config.force_override_avatars,
    ));
    metadata_tx
        .send(MetadataWrite::new(MetadataKey::HiderOverrideAvatar, &config.hider_override_avatar));
    metadata_tx.send(MetadataWrite::new(
        MetadataKey::SeekerOverrideAvatar,
        &config.seeker_override_avatar,
    ));

    trigger_tx.send(TriggerGameEvent(GameEvent::RoundStarted));

    info!("Round started with seekers {:?} out of {} players", seekers, players.len());
}

/// Picks `seeker_count` distinct seekers uniformly at random. Asking for
/// more seekers than players clamps to the player count.
pub fn choose_seekers(
    players: &[PlayerId],
    seeker_count: usize,
    rng: &mut impl Rng,
) -> Vec<PlayerId> {
    players.choose_multiple(rng, seeker_count).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    fn players(count: u8) -> Vec<PlayerId> {
        (0..count).map(PlayerId).collect()
    }

    #[test]
    fn picks_exactly_one_seeker_for_any_player_count() {
        let mut rng = StdRng::seed_from_u64(7);

        for count in 1..=16 {
            let seekers = choose_seekers(&players(count), 1, &mut rng);
            assert_eq!(seekers.len(), 1);
        }
    }

    #[test]
    fn never_picks_the_same_player_twice() {
        let mut rng = StdRng::seed_from_u64(42);

        let mut seekers = choose_seekers(&players(8), 3, &mut rng);
        seekers.sort();
        seekers.dedup();

        assert_eq!(seekers.len(), 3);
    }

    #[test]
    fn clamps_to_the_player_count() {
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(choose_seekers(&players(2), 5, &mut rng).len(), 2);
        assert!(choose_seekers(&[], 1, &mut rng).is_empty());
    }

    #[test]
    fn every_player_is_eventually_picked() {
        let mut rng = StdRng::seed_from_u64(1234);
        let players = players(4);
        let mut picked = std::collections::HashSet::new();

        for _ in 0..200 {
            picked.extend(choose_seekers(&players, 1, &mut rng));
        }

        assert_eq!(picked.len(), players.len());
    }
}
