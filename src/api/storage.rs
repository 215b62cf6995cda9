use reqwest::{
    multipart::{Form, Part},
    Method,
};
use url::Url;

use super::{segment, AppwriteClient};
use crate::{
    backend::FileStorage,
    error::{GatewayError, GatewayResult},
    models::{PreviewOptions, StoredFile, UploadFile},
};

fn files_path(bucket_id: &str) -> String {
    format!("/storage/buckets/{}/files", segment(bucket_id))
}

fn file_path(bucket_id: &str, file_id: &str) -> String {
    format!("{}/{}", files_path(bucket_id), segment(file_id))
}

impl FileStorage for AppwriteClient {
    async fn create_file(
        &self,
        bucket_id: &str,
        file_id: &str,
        file: &UploadFile,
    ) -> GatewayResult<StoredFile> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)?;
        let form = Form::new()
            .text("fileId", file_id.to_string())
            .part("file", part);

        let request = self.api.upload_request(&files_path(bucket_id))?.multipart(form);
        self.api.json(request).await
    }

    fn file_preview(
        &self,
        bucket_id: &str,
        file_id: &str,
        options: &PreviewOptions,
    ) -> GatewayResult<Url> {
        if bucket_id.is_empty() || file_id.is_empty() {
            return Err(GatewayError::Preview(file_id.to_string()));
        }

        let mut url = self
            .api
            .url(&format!("{}/preview", file_path(bucket_id, file_id)))?;
        url.query_pairs_mut()
            .append_pair("width", &options.width.to_string())
            .append_pair("height", &options.height.to_string())
            .append_pair("gravity", options.gravity.as_str())
            .append_pair("quality", &options.quality.to_string())
            .append_pair("project", self.api.project());
        Ok(url)
    }

    async fn delete_file(&self, bucket_id: &str, file_id: &str) -> GatewayResult<()> {
        let request = self
            .api
            .request(Method::DELETE, &file_path(bucket_id, file_id))?;
        self.api.empty(request).await
    }
}
