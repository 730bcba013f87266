//! JSON-file-backed ticket store implementation.
//!
//! The whole collection lives in memory and the file is rewritten in full
//! after every successful mutation.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{CreateTicketRequest, Ticket, TicketError, TicketStore};
use crate::config::StorageConfig;
use crate::metrics::{STORE_PERSIST_DURATION, STORE_PERSIST_FAILURES};

/// Id handed out by an empty store.
const FIRST_TICKET_ID: u64 = 1;

/// On-disk layout of the ticket file.
#[derive(Debug, Deserialize)]
struct StoreDocument {
    tickets: Vec<Ticket>,
    ticket_id_counter: u64,
}

/// Borrowed twin of [`StoreDocument`] used when writing.
#[derive(Serialize)]
struct StoreDocumentRef<'a> {
    tickets: &'a [Ticket],
    ticket_id_counter: u64,
}

#[derive(Debug)]
struct StoreState {
    tickets: Vec<Ticket>,
    next_id: u64,
}

impl StoreState {
    fn empty() -> Self {
        Self {
            tickets: Vec::new(),
            next_id: FIRST_TICKET_ID,
        }
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.tickets.iter().position(|ticket| ticket.id == id)
    }
}

/// Ticket store persisted as a single JSON file.
pub struct JsonTicketStore {
    path: PathBuf,
    create_parent_dirs: bool,
    state: Mutex<StoreState>,
}

impl JsonTicketStore {
    /// Open the store at `path`, loading existing tickets if the file exists.
    ///
    /// A missing file yields an empty store; nothing is written until the
    /// first mutation.
    pub fn open(path: &Path) -> Result<Self, TicketError> {
        let state = Self::load(path)?;
        info!(
            path = %path.display(),
            tickets = state.tickets.len(),
            next_id = state.next_id,
            "Ticket store loaded"
        );

        Ok(Self {
            path: path.to_path_buf(),
            create_parent_dirs: true,
            state: Mutex::new(state),
        })
    }

    /// Open the store described by the `[storage]` config section.
    pub fn from_config(config: &StorageConfig) -> Result<Self, TicketError> {
        Ok(Self::open(&config.path)?.with_create_parent_dirs(config.create_parent_dirs))
    }

    /// Whether the parent directory is created before each write.
    pub fn with_create_parent_dirs(mut self, enabled: bool) -> Self {
        self.create_parent_dirs = enabled;
        self
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Id the next created ticket will receive.
    pub fn next_id(&self) -> Result<u64, TicketError> {
        Ok(self.lock()?.next_id)
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, TicketError> {
        self.state
            .lock()
            .map_err(|_| TicketError::Storage("ticket store lock poisoned".to_string()))
    }

    fn load(path: &Path) -> Result<StoreState, TicketError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(StoreState::empty()),
            Err(e) => {
                return Err(TicketError::Storage(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let corrupted = |reason: String| TicketError::Corrupted {
            path: path.to_path_buf(),
            reason,
        };

        let document: StoreDocument =
            serde_json::from_str(&raw).map_err(|e| corrupted(e.to_string()))?;

        let mut seen = HashSet::with_capacity(document.tickets.len());
        for ticket in &document.tickets {
            if !seen.insert(ticket.id) {
                return Err(corrupted(format!("duplicate ticket id {}", ticket.id)));
            }
        }

        let max_id = document.tickets.iter().map(|t| t.id).max();
        let next_id = match max_id {
            Some(max_id) if document.ticket_id_counter <= max_id => {
                warn!(
                    path = %path.display(),
                    stored_counter = document.ticket_id_counter,
                    max_id,
                    "Ticket id counter behind stored tickets, advancing it"
                );
                max_id.checked_add(1).ok_or_else(|| {
                    corrupted(format!("ticket id {} leaves no room for a next id", max_id))
                })?
            }
            None if document.ticket_id_counter < FIRST_TICKET_ID => FIRST_TICKET_ID,
            _ => document.ticket_id_counter,
        };

        Ok(StoreState {
            tickets: document.tickets,
            next_id,
        })
    }

    fn persist(&self, state: &StoreState) -> Result<(), TicketError> {
        let timer = STORE_PERSIST_DURATION.start_timer();
        let result = self.write_file(state);
        timer.observe_duration();

        if result.is_err() {
            STORE_PERSIST_FAILURES.inc();
        }
        result
    }

    fn write_file(&self, state: &StoreState) -> Result<(), TicketError> {
        if self.create_parent_dirs {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    TicketError::Storage(format!(
                        "failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let document = StoreDocumentRef {
            tickets: &state.tickets,
            ticket_id_counter: state.next_id,
        };
        let payload = serde_json::to_vec_pretty(&document)
            .map_err(|e| TicketError::Storage(format!("failed to encode tickets: {}", e)))?;

        let temp_path = temp_path_for(&self.path);
        fs::write(&temp_path, &payload).map_err(|e| {
            TicketError::Storage(format!("failed to write {}: {}", temp_path.display(), e))
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            TicketError::Storage(format!(
                "failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(
            path = %self.path.display(),
            tickets = state.tickets.len(),
            next_id = state.next_id,
            bytes = payload.len(),
            "Ticket file written"
        );
        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

impl TicketStore for JsonTicketStore {
    fn create(&self, request: CreateTicketRequest) -> Result<Ticket, TicketError> {
        let mut state = self.lock()?;

        let following_id = state
            .next_id
            .checked_add(1)
            .ok_or_else(|| TicketError::Storage("ticket id space exhausted".to_string()))?;

        let ticket = Ticket::new(state.next_id, request.title, request.description);
        state.tickets.push(ticket.clone());
        state.next_id = following_id;

        if let Err(e) = self.persist(&state) {
            state.tickets.pop();
            state.next_id -= 1;
            return Err(e);
        }

        info!(ticket_id = ticket.id, "Ticket created");
        Ok(ticket)
    }

    fn get(&self, id: u64) -> Result<Ticket, TicketError> {
        let state = self.lock()?;
        state
            .tickets
            .iter()
            .find(|ticket| ticket.id == id)
            .cloned()
            .ok_or(TicketError::NotFound(id))
    }

    fn list(&self) -> Result<Vec<Ticket>, TicketError> {
        Ok(self.lock()?.tickets.clone())
    }

    fn delete(&self, id: u64) -> Result<Ticket, TicketError> {
        let mut state = self.lock()?;

        let index = state.position(id).ok_or(TicketError::NotFound(id))?;
        let removed = state.tickets.remove(index);

        if let Err(e) = self.persist(&state) {
            state.tickets.insert(index, removed);
            return Err(e);
        }

        info!(ticket_id = id, "Ticket deleted");
        Ok(removed)
    }
}
