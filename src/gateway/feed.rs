use super::{logged, Gateway};
use crate::{
    backend::{DocumentDatabase, Query},
    error::GatewayResult,
    models::{Document, DocumentList, Post},
};

pub const RECENT_LIMIT: u32 = 20;
pub const PAGE_SIZE: u32 = 10;

const UPDATED_AT: &str = "$updatedAt";

pub(crate) fn recent_queries() -> Vec<Query> {
    vec![Query::order_desc(UPDATED_AT), Query::limit(RECENT_LIMIT)]
}

pub(crate) fn page_queries(cursor: Option<&str>) -> Vec<Query> {
    let mut queries = vec![Query::order_desc(UPDATED_AT), Query::limit(PAGE_SIZE)];
    if let Some(cursor) = cursor.filter(|cursor| !cursor.is_empty()) {
        queries.push(Query::cursor_after(cursor));
    }
    queries
}

/// Resume point for the page after `page`, if there can be one.
pub fn next_cursor(page: &DocumentList<Post>) -> Option<&str> {
    if page.documents.len() < PAGE_SIZE as usize {
        return None;
    }
    page.documents.last().map(|post| post.id.as_str())
}

impl<A, D, S> Gateway<A, D, S>
where
    D: DocumentDatabase,
{
    pub async fn get_recent_posts(&self) -> GatewayResult<DocumentList<Post>> {
        logged(
            "Listing recent posts",
            self.database
                .list_documents(
                    &self.ids.database_id,
                    &self.ids.post_collection_id,
                    &recent_queries(),
                )
                .await,
        )
    }

    /// One page of the feed, starting strictly after `cursor` when given.
    pub async fn get_infinite_posts(
        &self,
        cursor: Option<&str>,
    ) -> GatewayResult<DocumentList<Post>> {
        logged(
            "Listing posts",
            self.database
                .list_documents(
                    &self.ids.database_id,
                    &self.ids.post_collection_id,
                    &page_queries(cursor),
                )
                .await,
        )
    }

    pub async fn search_posts(&self, term: &str) -> GatewayResult<DocumentList<Post>> {
        logged(
            "Searching posts",
            self.database
                .list_documents(
                    &self.ids.database_id,
                    &self.ids.post_collection_id,
                    &[Query::search("caption", term)],
                )
                .await,
        )
    }

    pub async fn get_post_by_id(&self, post_id: &str) -> GatewayResult<Document<Post>> {
        logged(
            "Fetching post",
            self.database
                .get_document(&self.ids.database_id, &self.ids.post_collection_id, post_id)
                .await,
        )
    }
}
