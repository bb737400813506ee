use crate::{config::ClientConfig, resources::Session, systems::labels};
use bevy::prelude::{App, Commands, EventWriter, IntoSystemConfig, Plugin, Res};
use hns_common::{
    laminar::{Config as NetworkConfig, Packet, Socket, SocketEvent},
    network::{
        ClientToServer, ConnectAckPacket, ConnectPacket, FullGameStatePacket, GameEventPacket,
        LobbyTickPacket, MetadataChangedPacket, NewPlayerPacket, ServerToClient,
    },
    resources::network::{NetRx, NetTx, NetworkThread},
};
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct ClientNetworkPlugin;

impl Plugin for ClientNetworkPlugin {
    fn build(&self, app: &mut App) {
        app.add_startup_system(setup)
            .add_event::<ConnectAckPacket>()
            .add_event::<NewPlayerPacket>()
            .add_event::<FullGameStatePacket>()
            .add_event::<LobbyTickPacket>()
            .add_event::<MetadataChangedPacket>()
            .add_event::<GameEventPacket>()
            .add_system(
                network_receive.in_set(labels::NetworkSystem::Receive).in_set(labels::Network),
            );
    }
}

fn setup(mut commands: Commands, config: Res<ClientConfig>) {
    let session = Session::new(config.server_addr);
    let mut socket = initialize_network(&session, &config.name);
    let (net_tx, net_rx) = (socket.get_packet_sender(), socket.get_event_receiver());

    let network_thread = std::thread::spawn(move || socket.start_polling());

    commands.insert_resource(session);
    commands.insert_resource(NetworkThread(network_thread));
    commands.insert_resource(NetTx(net_tx));
    commands.insert_resource(NetRx(net_rx));
}

fn initialize_network(session: &Session, name: &str) -> Socket {
    let net_config = NetworkConfig {
        idle_connection_timeout: Duration::from_secs(5),
        heartbeat_interval: Some(Duration::from_secs(4)),
        ..NetworkConfig::default()
    };

    let mut socket =
        Socket::bind_with_config("127.0.0.1:0", net_config).expect("Could not bind a local socket");

    let connect_packet = ClientToServer::Connect(ConnectPacket::new(name));
    socket
        .send(Packet::reliable_ordered(
            session.server_addr,
            bincode::serialize(&connect_packet).expect("connect packet serializes"),
            None,
        ))
        .expect("Could not send packet to server");

    socket
}

fn network_receive(
    session: Res<Session>,
    net_rx: Res<NetRx>,
    mut connect_ack_tx: EventWriter<ConnectAckPacket>,
    mut new_player_tx: EventWriter<NewPlayerPacket>,
    mut full_game_state_tx: EventWriter<FullGameStatePacket>,
    mut lobby_tick_tx: EventWriter<LobbyTickPacket>,
    mut metadata_changed_tx: EventWriter<MetadataChangedPacket>,
    mut game_event_tx: EventWriter<GameEventPacket>,
) {
    let net_rx = &net_rx.0;

    while let Ok(event) = net_rx.try_recv() {
        match event {
            SocketEvent::Packet(packet) => {
                let msg = packet.payload();

                if packet.addr() != session.server_addr {
                    warn!("Dropping a packet from an unknown sender: {}", packet.addr());
                    continue;
                }

                if let Ok(decoded) = bincode::deserialize::<ServerToClient>(msg) {
                    match decoded {
                        ServerToClient::ConnectAck(connect_ack_packet) => {
                            info!("Server accepted us, our id is {}", connect_ack_packet.id);

                            connect_ack_tx.send(connect_ack_packet);
                        },
                        ServerToClient::NewPlayer(new_player_packet) => {
                            new_player_tx.send(new_player_packet);
                        },
                        ServerToClient::FullGameState(full_game_state) => {
                            full_game_state_tx.send(full_game_state);
                        },
                        ServerToClient::LobbyTick(lobby_tick_packet) => {
                            lobby_tick_tx.send(lobby_tick_packet);
                        },
                        ServerToClient::MetadataChanged(metadata_changed_packet) => {
                            metadata_changed_tx.send(metadata_changed_packet);
                        },
                        ServerToClient::GameEvent(game_event_packet) => {
                            game_event_tx.send(game_event_packet);
                        },
                    }
                } else {
                    warn!("Received an invalid packet");
                }
            },
            SocketEvent::Timeout(addr) => {
                warn!("Server timed out: {}", addr);
            },
            SocketEvent::Connect(addr) => {
                debug!("Server connected: {}", addr);
            },
            SocketEvent::Disconnect(addr) => {
                warn!("Server disconnected: {}", addr);
            },
        }
    }
}
