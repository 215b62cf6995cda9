use log::{debug, error, info};

use super::{logged, Gateway};
use crate::{
    backend::{AuthProvider, DocumentDatabase, Query},
    error::{GatewayError, GatewayResult},
    models::{user::UserRecord, Document, NewUser, Session, Status, User, UNIQUE_ID},
};

impl<A, D, S> Gateway<A, D, S>
where
    A: AuthProvider,
    D: DocumentDatabase,
{
    /// Register an auth identity and mirror it into the users collection.
    pub async fn create_user_account(&self, user: NewUser) -> GatewayResult<Document<User>> {
        let account = logged(
            "Creating account",
            self.auth
                .create_account(UNIQUE_ID, &user.email, &user.password, &user.name)
                .await,
        )?;
        debug!("Created account {}", account.id);

        let avatar = logged("Deriving avatar", self.auth.initials_avatar(&account.name))?;
        self.save_user_to_db(UserRecord {
            account_id: &account.id,
            email: &account.email,
            name: &account.name,
            username: &user.username,
            image_url: avatar.as_str(),
        })
        .await
    }

    pub async fn save_user_to_db(&self, user: UserRecord<'_>) -> GatewayResult<Document<User>> {
        let saved: Document<User> = logged(
            "Saving user",
            self.database
                .create_document(
                    &self.ids.database_id,
                    &self.ids.user_collection_id,
                    UNIQUE_ID,
                    &user,
                )
                .await,
        )?;
        info!("Saved user {} ({})", saved.username, saved.id);
        Ok(saved)
    }

    pub async fn sign_in_account(&self, email: &str, password: &str) -> GatewayResult<Session> {
        let session = logged(
            "Signing in",
            self.auth.create_email_password_session(email, password).await,
        )?;
        info!("Signed in as {}", session.user_id);
        Ok(session)
    }

    pub async fn sign_out_account(&self) -> GatewayResult<Status> {
        logged("Signing out", self.auth.delete_session("current").await)?;
        Ok(Status::ok())
    }

    /// The users-collection record mirroring the signed in identity.
    pub async fn get_current_user(&self) -> GatewayResult<Document<User>> {
        let account = logged("Fetching account", self.auth.get_account().await)?;
        let users = logged(
            "Fetching user",
            self.database
                .list_documents::<User>(
                    &self.ids.database_id,
                    &self.ids.user_collection_id,
                    &[Query::equal("accountId", account.id.as_str())],
                )
                .await,
        )?;

        users.documents.into_iter().next().ok_or_else(|| {
            let err = GatewayError::NotFound(format!("user record for account {}", account.id));
            error!("Fetching user failed: {}", err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::gateway;

    fn ana() -> NewUser {
        NewUser {
            name: "Ana Lima".into(),
            username: "ana".into(),
            email: "ana@example.com".into(),
            password: "hunter22".into(),
        }
    }

    #[tokio::test]
    async fn sign_up_mirrors_account_into_users() {
        let gateway = gateway();
        let user = gateway.create_user_account(ana()).await.unwrap();

        let account = gateway.auth().accounts().pop().unwrap();
        assert_eq!(user.account_id, account.id);
        assert_eq!(user.username, "ana");
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.image_url, "https://avatars.test/initials?name=Ana%20Lima");
    }

    #[tokio::test]
    async fn current_user_follows_session() {
        let gateway = gateway();
        let created = gateway.create_user_account(ana()).await.unwrap();
        assert!(gateway.get_current_user().await.is_err());

        gateway.sign_in_account("ana@example.com", "hunter22").await.unwrap();
        assert_eq!(gateway.get_current_user().await.unwrap().id, created.id);

        gateway.sign_out_account().await.unwrap();
        assert!(gateway.get_current_user().await.is_err());
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let gateway = gateway();
        gateway.create_user_account(ana()).await.unwrap();
        assert!(gateway.sign_in_account("ana@example.com", "nope").await.is_err());
    }

    #[tokio::test]
    async fn identity_without_record_is_not_found() {
        let gateway = gateway();
        gateway.auth().sign_in_as("acc-orphan");
        assert!(gateway.get_current_user().await.unwrap_err().is_not_found());
    }
}
