pub mod file;
pub mod post;
pub mod user;

use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use file::{Gravity, PreviewOptions, StoredFile, UploadFile};
pub use post::{NewPost, Post, SavedPost, UpdatePost};
pub use user::{Account, NewUser, Session, User};

/// Id placeholder the backend replaces with a freshly generated one.
pub const UNIQUE_ID: &str = "unique()";

/// A database record: the backend's system fields plus the typed payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document<T> {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$collectionId", default)]
    pub collection_id: String,
    #[serde(rename = "$databaseId", default)]
    pub database_id: String,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "$updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: T,
}

impl<T> Deref for Document<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.fields
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentList<T> {
    pub total: u64,
    pub documents: Vec<Document<T>>,
}

impl<T> DocumentList<T> {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }
}

/// A relationship field, which the backend returns either as a bare id or as the nested record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecordRef<T> {
    Id(String),
    Expanded(Box<Document<T>>),
}

impl<T> RecordRef<T> {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Expanded(document) => &document.id,
        }
    }

    pub fn expanded(&self) -> Option<&Document<T>> {
        match self {
            Self::Id(_) => None,
            Self::Expanded(document) => Some(document),
        }
    }
}

/// Acknowledgement for operations that have nothing else to return.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Status {
    pub status: &'static str,
}

impl Status {
    pub const fn ok() -> Self {
        Self { status: "ok" }
    }
}
