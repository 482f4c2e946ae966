//! PostgreSQL repository implementations

mod conversation;
mod error;
mod message;
mod participant;
mod reaction;
mod user;

pub use conversation::PgConversationRepository;
pub use message::PgMessageRepository;
pub use participant::PgParticipantRepository;
pub use reaction::PgReactionRepository;
pub use user::PgUserRepository;
