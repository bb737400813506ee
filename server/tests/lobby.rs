use bevy::{
    ecs::event::Events,
    prelude::{App, NextState, State},
};
use hns_common::{
    components::player::{PlayerId, PlayerName},
    network::{ConnectPacket, ServerToClient},
    resources::PlayerToEntity,
    GameState,
};
use hns_server::{
    config::ServerConfig,
    events::{NewPlayer, OutgoingPacket},
    resources::AddrToPlayer,
    systems::{LobbyPlugin, PacketDestination},
};
use std::net::SocketAddr;

fn test_app(config: ServerConfig) -> App {
    let mut app = App::new();

    app.add_state::<GameState>()
        .insert_resource(config)
        .init_resource::<Events<NewPlayer>>()
        .init_resource::<Events<OutgoingPacket>>()
        .init_resource::<AddrToPlayer>()
        .init_resource::<PlayerToEntity>()
        .add_plugin(LobbyPlugin);

    app
}

fn join(app: &mut App, addr: SocketAddr, name: &str) {
    app.world
        .resource_mut::<Events<NewPlayer>>()
        .send(NewPlayer { addr, connect_packet: ConnectPacket::new(name) });
    app.update();
}

fn drain_outgoing(app: &mut App) -> Vec<OutgoingPacket> {
    app.world.resource_mut::<Events<OutgoingPacket>>().drain().collect()
}

fn addr(port: u16) -> SocketAddr {
    ([127, 0, 0, 1], port).into()
}

/// Mirrors what the disconnect handling does: clear both maps and despawn
/// the player entity.
fn leave(app: &mut App, leaver: SocketAddr) {
    let player_id = app.world.resource_mut::<AddrToPlayer>().0.remove(&leaver).unwrap();
    let entity = app.world.resource_mut::<PlayerToEntity>().0.remove(&player_id).unwrap();
    app.world.despawn(entity);
}

#[test]
fn joining_assigns_small_ids_in_order() {
    let mut app = test_app(ServerConfig::default());

    join(&mut app, addr(9001), "Ada");
    join(&mut app, addr(9002), "Grace");

    let players = app.world.resource::<AddrToPlayer>();
    assert_eq!(players.0.get(&addr(9001)), Some(&PlayerId(0)));
    assert_eq!(players.0.get(&addr(9002)), Some(&PlayerId(1)));
    assert_eq!(app.world.resource::<PlayerToEntity>().0.len(), 2);
}

#[test]
fn joining_spawns_a_player_entity() {
    let mut app = test_app(ServerConfig::default());

    join(&mut app, addr(9001), "Ada");

    let mut names = app.world.query::<(&PlayerId, &PlayerName)>();
    let players: Vec<_> = names.iter(&app.world).collect();

    assert_eq!(players.len(), 1);
    assert_eq!(players[0].0, &PlayerId(0));
    assert_eq!(players[0].1 .0, "Ada");
}

#[test]
fn new_player_gets_ack_and_full_state_and_others_get_new_player() {
    let mut app = test_app(ServerConfig::default());

    join(&mut app, addr(9001), "Ada");
    drain_outgoing(&mut app);

    join(&mut app, addr(9002), "Grace");
    let packets = drain_outgoing(&mut app);

    let acks: Vec<_> = packets
        .iter()
        .filter(|p| matches!(p.packet, ServerToClient::ConnectAck(_)))
        .collect();
    assert_eq!(acks.len(), 1);
    assert!(matches!(acks[0].destination, PacketDestination::Single(a) if a == addr(9002)));

    let full_states: Vec<_> = packets
        .iter()
        .filter_map(|p| match &p.packet {
            ServerToClient::FullGameState(state) => Some(state),
            _ => None,
        })
        .collect();
    assert_eq!(full_states.len(), 1);
    // The full state includes the receiver themselves.
    assert_eq!(full_states[0].players.len(), 2);

    assert!(packets.iter().any(|p| matches!(
        (&p.packet, &p.destination),
        (ServerToClient::NewPlayer(_), PacketDestination::BroadcastToSet(addrs))
            if addrs == &vec![addr(9001)]
    )));
}

#[test]
fn version_mismatch_is_rejected() {
    let mut app = test_app(ServerConfig::default());

    app.world.resource_mut::<Events<NewPlayer>>().send(NewPlayer {
        addr: addr(9001),
        connect_packet: ConnectPacket { version: 999, name: "Ada".to_string() },
    });
    app.update();

    assert!(app.world.resource::<AddrToPlayer>().0.is_empty());
}

#[test]
fn full_lobby_rejects_new_players() {
    let mut app = test_app(ServerConfig::default());

    for i in 0..hns_server::MAX_PLAYERS {
        join(&mut app, addr(9001 + i as u16), &format!("Player {i}"));
    }
    assert_eq!(app.world.resource::<AddrToPlayer>().0.len(), hns_server::MAX_PLAYERS);

    join(&mut app, addr(9900), "One Too Many");
    assert_eq!(app.world.resource::<AddrToPlayer>().0.len(), hns_server::MAX_PLAYERS);
}

#[test]
fn freed_ids_are_reused_without_colliding() {
    let mut app = test_app(ServerConfig::default());

    join(&mut app, addr(9001), "Ada");
    join(&mut app, addr(9002), "Grace");
    leave(&mut app, addr(9001));

    join(&mut app, addr(9003), "Edsger");

    let players = app.world.resource::<AddrToPlayer>();
    assert_eq!(players.0.get(&addr(9003)), Some(&PlayerId(0)));
    assert_eq!(players.0.get(&addr(9002)), Some(&PlayerId(1)));
}

#[test]
fn long_running_churn_never_steals_a_live_id() {
    let mut app = test_app(ServerConfig::default());

    join(&mut app, addr(9001), "Ada");

    // Well past 256 joins over the server's lifetime.
    for i in 0..300u16 {
        let transient = addr(10000 + i);
        join(&mut app, transient, "Guest");

        let id = *app.world.resource::<AddrToPlayer>().0.get(&transient).unwrap();
        assert_ne!(id, PlayerId(0));

        leave(&mut app, transient);
    }

    assert_eq!(app.world.resource::<AddrToPlayer>().0.get(&addr(9001)), Some(&PlayerId(0)));
}

#[test]
fn joins_after_round_start_are_rejected_and_drained() {
    let mut app = test_app(ServerConfig::default());

    join(&mut app, addr(9001), "Ada");

    app.world.resource_mut::<NextState<GameState>>().set(GameState::RoundActive);
    app.update();

    for i in 0..100u16 {
        app.world.resource_mut::<Events<NewPlayer>>().send(NewPlayer {
            addr: addr(10000 + i),
            connect_packet: ConnectPacket::new("Latecomer"),
        });
        app.update();
    }

    assert!(app.world.resource::<Events<NewPlayer>>().is_empty());
    assert_eq!(app.world.resource::<AddrToPlayer>().0.len(), 1);
}

#[test]
fn countdown_with_a_player_starts_the_round() {
    let mut app =
        test_app(ServerConfig { lobby_countdown_secs: 0, ..ServerConfig::default() });

    join(&mut app, addr(9001), "Ada");
    app.update();

    // One more update for the queued state transition to apply.
    app.update();

    assert_eq!(app.world.resource::<State<GameState>>().0, GameState::RoundActive);
}

#[test]
fn countdown_without_players_keeps_waiting() {
    let mut app =
        test_app(ServerConfig { lobby_countdown_secs: 0, ..ServerConfig::default() });

    app.update();
    app.update();

    assert_eq!(app.world.resource::<State<GameState>>().0, GameState::Lobby);
}
