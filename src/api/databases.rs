use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};

use super::{segment, AppwriteClient};
use crate::{
    backend::{DocumentDatabase, Query},
    error::GatewayResult,
    models::{Document, DocumentList},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBody<'a, F> {
    document_id: &'a str,
    data: &'a F,
}

#[derive(Serialize)]
struct UpdateBody<'a, F> {
    data: &'a F,
}

fn documents_path(database_id: &str, collection_id: &str) -> String {
    format!(
        "/databases/{}/collections/{}/documents",
        segment(database_id),
        segment(collection_id)
    )
}

fn document_path(database_id: &str, collection_id: &str, document_id: &str) -> String {
    format!(
        "{}/{}",
        documents_path(database_id, collection_id),
        segment(document_id)
    )
}

impl DocumentDatabase for AppwriteClient {
    async fn create_document<F, T>(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: &F,
    ) -> GatewayResult<Document<T>>
    where
        F: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let path = documents_path(database_id, collection_id);
        let request = self
            .api
            .request(Method::POST, &path)?
            .json(&CreateBody { document_id, data });
        self.api.json(request).await
    }

    async fn get_document<T>(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> GatewayResult<Document<T>>
    where
        T: DeserializeOwned + Send,
    {
        let path = document_path(database_id, collection_id, document_id);
        let request = self.api.request(Method::GET, &path)?;
        self.api.json(request).await
    }

    async fn list_documents<T>(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> GatewayResult<DocumentList<T>>
    where
        T: DeserializeOwned + Send,
    {
        let path = documents_path(database_id, collection_id);
        let queries: Vec<(&str, String)> = queries
            .iter()
            .map(|query| ("queries[]", query.encode()))
            .collect();
        let request = self.api.request(Method::GET, &path)?.query(&queries);
        self.api.json(request).await
    }

    async fn update_document<F, T>(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: &F,
    ) -> GatewayResult<Document<T>>
    where
        F: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let path = document_path(database_id, collection_id, document_id);
        let request = self
            .api
            .request(Method::PATCH, &path)?
            .json(&UpdateBody { data });
        self.api.json(request).await
    }

    async fn delete_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> GatewayResult<()> {
        let path = document_path(database_id, collection_id, document_id);
        let request = self.api.request(Method::DELETE, &path)?;
        self.api.empty(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_document_paths() {
        assert_eq!(
            documents_path("main", "posts"),
            "/databases/main/collections/posts/documents"
        );
        assert_eq!(
            document_path("main", "saves", "s 1"),
            "/databases/main/collections/saves/documents/s%201"
        );
    }
}
