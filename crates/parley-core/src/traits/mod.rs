//! Ports - repository, queue, and presence interfaces the domain needs
//! from infrastructure

mod presence;
mod queue;
mod repositories;

pub use presence::{PresenceData, PresenceStore, TypingData};
pub use queue::{NotificationJob, NotificationQueue};
pub use repositories::{
    ConversationRepository, MessageQuery, MessageRepository, MessageWithSender,
    ParticipantRepository, ReactionRepository, RepoResult, UserRepository,
};
