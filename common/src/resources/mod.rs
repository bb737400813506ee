use crate::components::player::PlayerId;
use bevy::prelude::{Entity, Resource};
use std::collections::HashMap;

#[derive(Debug, Default, Resource)]
pub struct PlayerToEntity(pub HashMap<PlayerId, Entity>);

pub mod network {
    use crossbeam_channel::{Receiver, Sender};
    use bevy::prelude::Resource;
    use laminar::SocketEvent;
    use std::thread::JoinHandle;

    #[derive(Debug, Resource)]
    pub struct NetworkThread(pub JoinHandle<()>);

    #[derive(Debug, Resource)]
    pub struct NetTx(pub Sender<laminar::Packet>);

    #[derive(Debug, Resource)]
    pub struct NetRx(pub Receiver<SocketEvent>);
}
