//! The three hosted services the gateway talks to.
//!
//! [`crate::api::AppwriteClient`] implements all of them over HTTP. Anything else that can
//! authenticate, store documents and hold files can stand in for it.

pub mod query;

use std::future::Future;

use serde::{de::DeserializeOwned, Serialize};
use url::Url;

pub use query::Query;

use crate::{
    error::GatewayResult,
    models::{Account, Document, DocumentList, PreviewOptions, Session, StoredFile, UploadFile},
};

pub trait AuthProvider: Send + Sync {
    fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> impl Future<Output = GatewayResult<Account>> + Send;

    fn create_email_password_session(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = GatewayResult<Session>> + Send;

    /// `"current"` addresses the session making the call.
    fn delete_session(&self, session_id: &str) -> impl Future<Output = GatewayResult<()>> + Send;

    fn get_account(&self) -> impl Future<Output = GatewayResult<Account>> + Send;

    /// URL of an avatar rendered from the initials of `name`.
    fn initials_avatar(&self, name: &str) -> GatewayResult<Url>;
}

pub trait DocumentDatabase: Send + Sync {
    fn create_document<F, T>(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: &F,
    ) -> impl Future<Output = GatewayResult<Document<T>>> + Send
    where
        F: Serialize + Sync,
        T: DeserializeOwned + Send;

    fn get_document<T>(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> impl Future<Output = GatewayResult<Document<T>>> + Send
    where
        T: DeserializeOwned + Send;

    fn list_documents<T>(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> impl Future<Output = GatewayResult<DocumentList<T>>> + Send
    where
        T: DeserializeOwned + Send;

    fn update_document<F, T>(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: &F,
    ) -> impl Future<Output = GatewayResult<Document<T>>> + Send
    where
        F: Serialize + Sync,
        T: DeserializeOwned + Send;

    fn delete_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> impl Future<Output = GatewayResult<()>> + Send;
}

pub trait FileStorage: Send + Sync {
    fn create_file(
        &self,
        bucket_id: &str,
        file_id: &str,
        file: &UploadFile,
    ) -> impl Future<Output = GatewayResult<StoredFile>> + Send;

    /// Preview URLs are derived locally; no request is made.
    fn file_preview(
        &self,
        bucket_id: &str,
        file_id: &str,
        options: &PreviewOptions,
    ) -> GatewayResult<Url>;

    fn delete_file(&self, bucket_id: &str, file_id: &str)
        -> impl Future<Output = GatewayResult<()>> + Send;
}
