use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    api::CookieFallback,
    backend::{AuthProvider, DocumentDatabase},
    gateway::Gateway,
    models::{Document, User},
};

/// Profile fields of the signed in user, empty until a session is confirmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub image_url: String,
    pub bio: String,
}

impl From<Document<User>> for SessionUser {
    fn from(user: Document<User>) -> Self {
        Self {
            id: user.id,
            name: user.fields.name,
            username: user.fields.username,
            email: user.fields.email,
            image_url: user.fields.image_url,
            bio: user.fields.bio.unwrap_or_default(),
        }
    }
}

/// Where the front end should land after [`SessionCache::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// No session marker was found; go to sign-in before anything else.
    SignIn,
    /// A marker exists; stay where you are.
    Resume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitOutcome {
    pub entry: Entry,
    pub authenticated: bool,
}

/// Keeps the loading flag set until dropped.
struct Loading<'a>(&'a mut bool);

impl<'a> Loading<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Who is signed in, as last confirmed against the backend.
pub struct SessionCache<A, D, S> {
    gateway: Arc<Gateway<A, D, S>>,
    fallback: Arc<CookieFallback>,
    user: SessionUser,
    is_loading: bool,
    is_authenticated: bool,
}

impl<A, D, S> SessionCache<A, D, S>
where
    A: AuthProvider,
    D: DocumentDatabase,
{
    pub fn new(gateway: Arc<Gateway<A, D, S>>, fallback: Arc<CookieFallback>) -> Self {
        Self {
            gateway,
            fallback,
            user: SessionUser::default(),
            is_loading: false,
            is_authenticated: false,
        }
    }

    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    /// Cheap local pre-check on the session marker, then a real check with the backend.
    ///
    /// The marker is a hint only; `authenticated` comes from the backend.
    pub async fn init(&mut self) -> InitOutcome {
        let entry = if self.fallback.is_empty().await {
            debug!("No session marker, sending to sign-in");
            Entry::SignIn
        } else {
            Entry::Resume
        };

        let authenticated = self.check_auth_user().await;
        InitOutcome {
            entry,
            authenticated,
        }
    }

    /// Refresh the cached user from the backend. Loading is cleared whatever the outcome.
    pub async fn check_auth_user(&mut self) -> bool {
        let current = {
            let _loading = Loading::start(&mut self.is_loading);
            self.gateway.get_current_user().await
        };

        match current {
            Ok(user) => {
                self.user = user.into();
                self.is_authenticated = true;
                info!("Authenticated as {}", self.user.username);
                true
            }
            Err(e) => {
                warn!("Not authenticated: {}", e);
                self.is_authenticated = false;
                false
            }
        }
    }

    /// Drop whatever was cached and return to the signed out state.
    pub fn dispose(&mut self) {
        self.user = SessionUser::default();
        self.is_loading = false;
        self.is_authenticated = false;
    }
}
