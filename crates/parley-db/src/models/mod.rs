//! Database models - row shapes with SQLx `FromRow` derives

mod conversation;
mod message;
mod participant;
mod reaction;
mod user;

pub use conversation::ConversationModel;
pub use message::{MessageModel, MessageWithSenderModel};
pub use participant::ParticipantModel;
pub use reaction::ReactionModel;
pub use user::UserModel;
