//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod context;
pub mod error;
pub mod messaging;
pub mod notification;
pub mod presence;
pub mod reaction;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use messaging::MessagingService;
pub use notification::NotificationProducer;
pub use presence::PresenceService;
pub use reaction::ReactionService;
