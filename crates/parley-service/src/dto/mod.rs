//! Data transfer objects crossing the service boundary
//!
//! This module provides:
//! - Request DTOs with validation for gateway inputs
//! - Response DTOs for serializing gateway outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::SendMessageRequest;

pub use responses::{
    ConversationView, MessageResponse, ParticipantView, ReactionResponse, ReadMarkerResponse,
    UserResponse,
};

pub use mappers::ConversationWithDetails;
