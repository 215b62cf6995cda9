//! User intents mapped onto the backend services.
//!
//! Every operation logs its own failures and hands them back as a [`GatewayError`]; callers
//! never get an empty value standing in for an error. Multi-step operations are not atomic:
//! when a later step fails the gateway undoes what it can (deleting a file it just uploaded)
//! and reports the original failure.

mod account;
mod engagement;
mod feed;
mod post;

use log::error;

use crate::{config::BackendIds, error::GatewayResult};

pub use engagement::toggle_like;
pub use feed::{next_cursor, PAGE_SIZE, RECENT_LIMIT};
pub use post::normalize_tags;

#[derive(Debug, Clone)]
pub struct Gateway<A, D, S> {
    auth: A,
    database: D,
    storage: S,
    ids: BackendIds,
}

impl<A, D, S> Gateway<A, D, S> {
    pub fn new(auth: A, database: D, storage: S, ids: BackendIds) -> Self {
        Self {
            auth,
            database,
            storage,
            ids,
        }
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    pub fn database(&self) -> &D {
        &self.database
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn logged<T>(action: &str, result: GatewayResult<T>) -> GatewayResult<T> {
    if let Err(e) = &result {
        error!("{} failed: {}", action, e);
    }
    result
}
