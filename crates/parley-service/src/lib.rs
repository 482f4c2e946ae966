//! # parley-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    MessagingService, NotificationProducer, PresenceService, ReactionService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult,
};

#[cfg(test)]
pub(crate) mod test_support;
