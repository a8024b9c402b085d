//! In-memory conversation store.
//!
//! Conversations live only for the lifetime of the process. The id map is
//! guarded by a `parking_lot::RwLock`; each conversation carries its own async
//! mutex so a whole chat exchange (read history, call the reasoner, append the
//! user and assistant turns) can hold it across the upstream call. Requests on
//! the same conversation are therefore applied one after another, and a user
//! turn is always directly followed by its assistant turn. Deletes take the
//! same lock, so they are ordered with the exchanges around them.

use crate::types::{AppError, Result, Turn};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// A single conversation's ordered turn sequence.
#[derive(Debug)]
pub struct Session {
    id: String,
    turns: Mutex<Vec<Turn>>,
    // Set by `SessionStore::delete` while it holds `turns`.
    removed: AtomicBool,
}

impl Session {
    fn new(id: String) -> Self {
        Self {
            id,
            turns: Mutex::new(Vec::new()),
            removed: AtomicBool::new(false),
        }
    }

    /// Locks the turn sequence for the duration of an exchange.
    ///
    /// Fails with `NotFound` if the conversation was deleted while the caller
    /// was waiting for the lock.
    pub async fn lock(&self) -> Result<MutexGuard<'_, Vec<Turn>>> {
        let turns = self.turns.lock().await;
        if self.removed.load(Ordering::Acquire) {
            return Err(not_found(&self.id));
        }
        Ok(turns)
    }
}

/// Process-wide conversation store, shared through `AppState`.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new, empty conversation and returns its id.
    pub fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .insert(id.clone(), Arc::new(Session::new(id.clone())));
        id
    }

    /// Returns a handle to the conversation, for callers that need to hold
    /// its lock across several steps.
    pub fn session(&self, conversation_id: &str) -> Result<Arc<Session>> {
        self.sessions
            .read()
            .get(conversation_id)
            .cloned()
            .ok_or_else(|| not_found(conversation_id))
    }

    /// Appends a turn to the end of the conversation.
    pub async fn append(&self, conversation_id: &str, turn: Turn) -> Result<()> {
        let session = self.session(conversation_id)?;
        session.lock().await?.push(turn);
        Ok(())
    }

    /// Returns a snapshot of the conversation's turns, in append order.
    pub async fn get(&self, conversation_id: &str) -> Result<Vec<Turn>> {
        let session = self.session(conversation_id)?;
        let turns = session.lock().await?;
        Ok(turns.clone())
    }

    /// Removes the conversation and all of its turns.
    ///
    /// Waits for any exchange in progress on the conversation to finish first,
    /// so a delete is ordered after every request that locked it earlier.
    pub async fn delete(&self, conversation_id: &str) -> Result<()> {
        let session = self.session(conversation_id)?;
        let _turns = session.lock().await?;
        session.removed.store(true, Ordering::Release);
        self.sessions.write().remove(conversation_id);
        Ok(())
    }

    pub fn contains(&self, conversation_id: &str) -> bool {
        self.sessions.read().contains_key(conversation_id)
    }

    /// Number of live conversations.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

fn not_found(conversation_id: &str) -> AppError {
    AppError::NotFound(format!("Conversation not found: {}", conversation_id))
}
