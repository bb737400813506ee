pub mod labels;
mod lobby;
mod network;
mod replication;
mod round;

pub use lobby::*;
pub use network::*;
pub use replication::*;
pub use round::*;
