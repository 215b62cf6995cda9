use log::{debug, info, warn};
use url::Url;

use super::{logged, Gateway};
use crate::{
    backend::{DocumentDatabase, FileStorage},
    error::{GatewayError, GatewayResult},
    models::{
        post::PostFields, Document, NewPost, Post, PreviewOptions, Status, StoredFile,
        UpdatePost, UploadFile, UNIQUE_ID,
    },
};

/// Strip all whitespace, then split on commas. Empty segments are dropped.
pub fn normalize_tags(tags: &str) -> Vec<String> {
    let compact: String = tags.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .split(',')
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

impl<A, D, S> Gateway<A, D, S>
where
    D: DocumentDatabase,
    S: FileStorage,
{
    pub async fn upload_file(&self, file: &UploadFile) -> GatewayResult<StoredFile> {
        let uploaded = logged(
            "Uploading file",
            self.storage
                .create_file(&self.ids.storage_id, UNIQUE_ID, file)
                .await,
        )?;
        debug!("Uploaded {} as {}", file.name, uploaded.id);
        Ok(uploaded)
    }

    pub fn file_preview(&self, file_id: &str) -> GatewayResult<Url> {
        logged(
            "Deriving file preview",
            self.storage
                .file_preview(&self.ids.storage_id, file_id, &PreviewOptions::default()),
        )
    }

    pub async fn delete_file(&self, file_id: &str) -> GatewayResult<Status> {
        logged(
            "Deleting file",
            self.storage.delete_file(&self.ids.storage_id, file_id).await,
        )?;
        Ok(Status::ok())
    }

    /// Best-effort cleanup after a later step failed; the caller reports the original error.
    async fn discard_file(&self, file_id: &str) {
        match self.storage.delete_file(&self.ids.storage_id, file_id).await {
            Ok(()) => debug!("Discarded file {}", file_id),
            Err(e) => warn!("Could not discard file {}: {}", file_id, e),
        }
    }

    async fn preview_or_discard(&self, file_id: &str) -> GatewayResult<Url> {
        match self.file_preview(file_id) {
            Ok(url) => Ok(url),
            Err(_) => {
                self.discard_file(file_id).await;
                Err(GatewayError::Preview(file_id.to_string()))
            }
        }
    }

    pub async fn create_post(&self, post: NewPost) -> GatewayResult<Document<Post>> {
        let [file] = post.file.as_slice() else {
            return Err(GatewayError::Precondition("a post needs exactly one image"));
        };
        if post.user_id.is_empty() {
            return Err(GatewayError::Precondition("creator id is required"));
        }

        let uploaded = self.upload_file(file).await?;
        let image_url = self.preview_or_discard(&uploaded.id).await?;

        let tags = normalize_tags(&post.tags);
        let fields = PostFields {
            creator: Some(&post.user_id),
            caption: &post.caption,
            image_url: image_url.as_str(),
            image_id: &uploaded.id,
            location: post.location.as_deref(),
            tags: &tags,
        };

        let created = self
            .database
            .create_document(
                &self.ids.database_id,
                &self.ids.post_collection_id,
                UNIQUE_ID,
                &fields,
            )
            .await;
        match logged("Creating post", created) {
            Ok(created) => {
                info!("Created post {}", created.id);
                Ok(created)
            }
            Err(e) => {
                self.discard_file(&uploaded.id).await;
                Err(e)
            }
        }
    }

    /// Rewrite a post's fields, swapping its image when `post.file` holds one.
    ///
    /// The replaced image is left in storage. When the write fails, the post's *original*
    /// image (`post.image_id`) is deleted, not the one just uploaded.
    pub async fn update_post(&self, post: UpdatePost) -> GatewayResult<Document<Post>> {
        if post.post_id.is_empty() {
            return Err(GatewayError::Precondition("post id is required"));
        }

        let (image_url, image_id) = match post.file.as_slice() {
            [] => (post.image_url.clone(), post.image_id.clone()),
            [file] => {
                let uploaded = self.upload_file(file).await?;
                let image_url = self.preview_or_discard(&uploaded.id).await?;
                (image_url.to_string(), uploaded.id)
            }
            _ => return Err(GatewayError::Precondition("a post takes at most one image")),
        };

        let tags = normalize_tags(&post.tags);
        let fields = PostFields {
            creator: None,
            caption: &post.caption,
            image_url: &image_url,
            image_id: &image_id,
            location: post.location.as_deref(),
            tags: &tags,
        };

        let updated = self
            .database
            .update_document(
                &self.ids.database_id,
                &self.ids.post_collection_id,
                &post.post_id,
                &fields,
            )
            .await;
        match logged("Updating post", updated) {
            Ok(updated) => {
                info!("Updated post {}", updated.id);
                Ok(updated)
            }
            Err(e) => {
                self.discard_file(&post.image_id).await;
                Err(e)
            }
        }
    }

    /// Remove the post record. Its image stays in storage.
    pub async fn delete_post(&self, post_id: &str, image_id: &str) -> GatewayResult<Status> {
        if post_id.is_empty() || image_id.is_empty() {
            return Err(GatewayError::Precondition("post id and image id are required"));
        }

        logged(
            "Deleting post",
            self.database
                .delete_document(&self.ids.database_id, &self.ids.post_collection_id, post_id)
                .await,
        )?;
        info!("Deleted post {}", post_id);
        Ok(Status::ok())
    }
}
