use log::info;

use super::{logged, Gateway};
use crate::{
    backend::DocumentDatabase,
    error::GatewayResult,
    models::{
        post::{LikesChange, SaveFields},
        Document, Post, SavedPost, Status, UNIQUE_ID,
    },
};

/// The liker list after `user_id` likes or un-likes a post.
pub fn toggle_like(likes: &[String], user_id: &str) -> Vec<String> {
    if likes.iter().any(|id| id == user_id) {
        likes.iter().filter(|id| *id != user_id).cloned().collect()
    } else {
        let mut likes = likes.to_vec();
        likes.push(user_id.to_string());
        likes
    }
}

impl<A, D, S> Gateway<A, D, S>
where
    D: DocumentDatabase,
{
    /// Overwrite the whole liker list; concurrent writers race and the last one wins.
    pub async fn like_post(
        &self,
        post_id: &str,
        likes: &[String],
    ) -> GatewayResult<Document<Post>> {
        logged(
            "Liking post",
            self.database
                .update_document(
                    &self.ids.database_id,
                    &self.ids.post_collection_id,
                    post_id,
                    &LikesChange { likes },
                )
                .await,
        )
    }

    pub async fn save_post(
        &self,
        user_id: &str,
        post_id: &str,
    ) -> GatewayResult<Document<SavedPost>> {
        let saved: Document<SavedPost> = logged(
            "Saving post",
            self.database
                .create_document(
                    &self.ids.database_id,
                    &self.ids.saves_collection_id,
                    UNIQUE_ID,
                    &SaveFields {
                        users: user_id,
                        post: post_id,
                    },
                )
                .await,
        )?;
        info!("Saved post {} as {}", post_id, saved.id);
        Ok(saved)
    }

    pub async fn delete_saved_post(&self, saved_record_id: &str) -> GatewayResult<Status> {
        logged(
            "Removing saved post",
            self.database
                .delete_document(
                    &self.ids.database_id,
                    &self.ids.saves_collection_id,
                    saved_record_id,
                )
                .await,
        )?;
        Ok(Status::ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{gateway, new_post};

    #[test]
    fn toggles_membership() {
        let likes = vec!["u1".to_string(), "u2".to_string()];
        assert_eq!(toggle_like(&likes, "u3"), vec!["u1", "u2", "u3"]);
        assert_eq!(toggle_like(&likes, "u1"), vec!["u2"]);
        assert!(toggle_like(&[], "u1") == vec!["u1"]);
    }

    #[tokio::test]
    async fn like_replaces_whole_list() {
        let gateway = gateway();
        let post = gateway.create_post(new_post("u1", "")).await.unwrap();

        let liked = gateway
            .like_post(&post.id, &["u2".to_string(), "u3".to_string()])
            .await
            .unwrap();
        assert_eq!(liked.liker_ids(), vec!["u2", "u3"]);

        let liked = gateway.like_post(&post.id, &["u4".to_string()]).await.unwrap();
        assert_eq!(liked.liker_ids(), vec!["u4"]);
        assert_eq!(liked.caption, post.caption);
    }

    #[tokio::test]
    async fn save_and_unsave_by_record_id() {
        let gateway = gateway();
        let saved = gateway.save_post("u1", "p1").await.unwrap();
        assert_eq!(saved.users.id(), "u1");
        assert_eq!(saved.post.id(), "p1");
        assert_eq!(saved.collection_id, "saves");

        assert_eq!(gateway.delete_saved_post(&saved.id).await.unwrap(), Status::ok());
        assert!(gateway.delete_saved_post(&saved.id).await.is_err());
    }
}
