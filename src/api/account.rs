use reqwest::Method;
use serde_json::json;
use url::Url;

use super::{segment, AppwriteClient};
use crate::{
    backend::AuthProvider,
    error::GatewayResult,
    models::{Account, Session},
};

impl AuthProvider for AppwriteClient {
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> GatewayResult<Account> {
        let request = self.api.request(Method::POST, "/account")?.json(&json!({
            "userId": user_id,
            "email": email,
            "password": password,
            "name": name,
        }));
        self.api.json(request).await
    }

    async fn create_email_password_session(
        &self,
        email: &str,
        password: &str,
    ) -> GatewayResult<Session> {
        let request = self
            .api
            .request(Method::POST, "/account/sessions/email")?
            .json(&json!({ "email": email, "password": password }));
        self.api.json(request).await
    }

    async fn delete_session(&self, session_id: &str) -> GatewayResult<()> {
        let path = format!("/account/sessions/{}", segment(session_id));
        let request = self.api.request(Method::DELETE, &path)?;
        self.api.empty(request).await?;
        if session_id == "current" {
            self.api.fallback().clear().await?;
        }
        Ok(())
    }

    async fn get_account(&self) -> GatewayResult<Account> {
        let request = self.api.request(Method::GET, "/account")?;
        self.api.json(request).await
    }

    fn initials_avatar(&self, name: &str) -> GatewayResult<Url> {
        let mut url = self.api.url("/avatars/initials")?;
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("project", self.api.project());
        Ok(url)
    }
}
