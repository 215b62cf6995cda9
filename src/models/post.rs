use serde::{Deserialize, Serialize};

use super::{file::UploadFile, user::User, RecordRef};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub creator: RecordRef<User>,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: String,
    pub image_id: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub likes: Vec<RecordRef<User>>,
}

impl Post {
    pub fn liker_ids(&self) -> Vec<String> {
        self.likes.iter().map(|like| like.id().to_string()).collect()
    }
}

/// Bookmark joining a user and a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedPost {
    pub users: RecordRef<User>,
    pub post: RecordRef<Post>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: String,
    pub caption: String,
    /// Must hold exactly one image.
    pub file: Vec<UploadFile>,
    pub location: Option<String>,
    /// Comma separated, free text.
    pub tags: String,
}

#[derive(Debug, Clone)]
pub struct UpdatePost {
    pub post_id: String,
    pub caption: String,
    pub image_id: String,
    pub image_url: String,
    /// Empty when the image is unchanged.
    pub file: Vec<UploadFile>,
    pub location: Option<String>,
    pub tags: String,
}

/// Post fields as written to the database.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostFields<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<&'a str>,
    pub caption: &'a str,
    pub image_url: &'a str,
    pub image_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
    pub tags: &'a [String],
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LikesChange<'a> {
    pub likes: &'a [String],
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SaveFields<'a> {
    pub users: &'a str,
    pub post: &'a str,
}
