//! Wire protocol
//!
//! JSON text frames, internally tagged on `type`.

mod events;

pub use events::{ClientEvent, ServerEvent};
