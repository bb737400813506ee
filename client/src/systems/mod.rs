pub mod labels;
mod lobby;
mod network;
mod notifications;
mod round;

pub use lobby::*;
pub use network::*;
pub use notifications::*;
pub use round::*;
