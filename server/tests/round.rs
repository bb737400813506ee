use bevy::{
    ecs::event::Events,
    prelude::{App, NextState},
};
use hns_common::{
    components::player::{PlayerId, PlayerName, PlayerNetworkAddr},
    metadata::{MetadataKey, MetadataStore},
    network::ServerToClient,
    GameState,
};
use hns_server::{
    components::ServerPlayerBundle,
    config::ServerConfig,
    events::OutgoingPacket,
    resources::SessionRng,
    systems::{PacketDestination, ReplicationPlugin, RoundPlugin},
};
use rand::{rngs::StdRng, SeedableRng};

fn test_app(player_count: u8, seed: u64) -> App {
    let mut app = App::new();

    app.add_state::<GameState>()
        .insert_resource(ServerConfig::default())
        .init_resource::<Events<OutgoingPacket>>()
        .add_plugin(RoundPlugin)
        .add_plugin(ReplicationPlugin);

    // The plugin seeds from entropy; tests want determinism.
    app.insert_resource(SessionRng(StdRng::seed_from_u64(seed)));

    for i in 0..player_count {
        app.world.spawn(ServerPlayerBundle {
            id: PlayerId(i),
            name: PlayerName(format!("Player {i}")),
            network_addr: PlayerNetworkAddr(([127, 0, 0, 1], 9000 + i as u16).into()),
        });
    }

    app
}

fn start_round(app: &mut App) {
    app.world.resource_mut::<NextState<GameState>>().set(GameState::RoundActive);
    app.update();
}

fn seeker_flags(app: &App, player_count: u8) -> Vec<bool> {
    let store = app.world.resource::<MetadataStore>();

    (0..player_count)
        .map(|i| store.get_bool(MetadataKey::Seeker(PlayerId(i))).unwrap())
        .collect()
}

#[test]
fn exactly_one_seeker_for_any_player_count() {
    for player_count in [1u8, 2, 4, 16] {
        let mut app = test_app(player_count, 99);
        start_round(&mut app);

        let flags = seeker_flags(&app, player_count);
        let seeker_count = flags.iter().filter(|is_seeker| **is_seeker).count();

        assert_eq!(seeker_count, 1, "expected one seeker with {player_count} players");
    }
}

#[test]
fn starting_a_round_resets_previous_seeker_flags() {
    let mut app = test_app(4, 7);

    // Simulate a previous round having marked everyone a seeker.
    {
        let mut store = app.world.resource_mut::<MetadataStore>();
        for i in 0..4 {
            store.set_bool(MetadataKey::Seeker(PlayerId(i)), true);
        }
    }

    start_round(&mut app);

    let seeker_count = seeker_flags(&app, 4).iter().filter(|is_seeker| **is_seeker).count();
    assert_eq!(seeker_count, 1);
}

#[test]
fn round_settings_are_written_from_config() {
    let mut app = test_app(2, 3);
    start_round(&mut app);

    let store = app.world.resource::<MetadataStore>();

    assert_eq!(store.get_bool(MetadataKey::ForceOverrideAvatars), Ok(true));
    assert_eq!(store.get(MetadataKey::HiderOverrideAvatar), Some("avatar.light"));
    assert_eq!(store.get(MetadataKey::SeekerOverrideAvatar), Some("avatar.tall"));
}

#[test]
fn round_start_broadcasts_metadata_before_the_trigger() {
    let mut app = test_app(3, 11);
    start_round(&mut app);

    let packets: Vec<OutgoingPacket> =
        app.world.resource_mut::<Events<OutgoingPacket>>().drain().collect();

    assert!(!packets.is_empty());
    assert!(packets
        .iter()
        .all(|packet| matches!(packet.destination, PacketDestination::BroadcastToAll)));

    let trigger_index = packets
        .iter()
        .position(|packet| matches!(packet.packet, ServerToClient::GameEvent(_)))
        .expect("round start should broadcast a game event");

    // Every metadata change has to land before the round-start trigger.
    assert_eq!(trigger_index, packets.len() - 1);
    assert!(packets[..trigger_index]
        .iter()
        .all(|packet| matches!(packet.packet, ServerToClient::MetadataChanged(_))));

    // Per-player reset + role flip + three round settings.
    assert_eq!(trigger_index, 3 + 1 + 3);
}

#[test]
fn same_seed_picks_the_same_seeker() {
    let mut first = test_app(8, 1234);
    let mut second = test_app(8, 1234);

    start_round(&mut first);
    start_round(&mut second);

    assert_eq!(seeker_flags(&first, 8), seeker_flags(&second, 8));
}
