//! Ticket system for tracking support requests.

mod json_store;
mod store;
mod types;

pub use json_store::JsonTicketStore;
pub use store::{CreateTicketRequest, TicketError, TicketStore};
pub use types::{parse_timestamp, Ticket, DEFAULT_STATUS};
