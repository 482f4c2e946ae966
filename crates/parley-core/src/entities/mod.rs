//! Domain entities - core business objects

mod conversation;
mod message;
mod participant;
mod reaction;
mod user;

pub use conversation::Conversation;
pub use message::Message;
pub use participant::Participant;
pub use reaction::Reaction;
pub use user::User;
