//! Ticket storage trait and types.

use std::path::PathBuf;

use thiserror::Error;

use crate::ticket::Ticket;

/// Error type for ticket operations.
#[derive(Debug, Error)]
pub enum TicketError {
    /// No ticket carries the requested id.
    #[error("Ticket not found: {0}")]
    NotFound(u64),

    /// The ticket file exists but cannot be understood.
    #[error("Ticket file {path:?} is corrupted: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    /// Reading or writing the ticket file failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Request to create a new ticket.
#[derive(Debug, Clone)]
pub struct CreateTicketRequest {
    /// Short summary.
    pub title: String,
    /// Free-form details.
    pub description: String,
}

impl CreateTicketRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Trait for ticket storage backends.
///
/// Every mutating call has reached durable storage by the time it returns `Ok`.
pub trait TicketStore: Send + Sync {
    /// Create a new open ticket with the next id.
    fn create(&self, request: CreateTicketRequest) -> Result<Ticket, TicketError>;

    /// Get a ticket by id.
    fn get(&self, id: u64) -> Result<Ticket, TicketError>;

    /// List all tickets in insertion order.
    fn list(&self) -> Result<Vec<Ticket>, TicketError>;

    /// Permanently delete a ticket.
    /// Returns the deleted ticket if found.
    fn delete(&self, id: u64) -> Result<Ticket, TicketError>;
}
