mod account;
mod databases;
pub mod fallback;
mod storage;

use std::sync::Arc;

use log::{debug, log_enabled, trace};
use reqwest::{header, Client, Method, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Semaphore, SemaphorePermit};
use url::Url;

use crate::{
    config::Config,
    error::{GatewayError, GatewayResult},
};

pub use fallback::{CookieFallback, FALLBACK_HEADER};

const PROJECT_HEADER: &str = "x-appwrite-project";
const RESPONSE_FORMAT_HEADER: &str = "x-appwrite-response-format";
const RESPONSE_FORMAT: &str = "1.5.0";
const USER_AGENT: &str = concat!("minglekari/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP plumbing: concurrency limit, retries, project and session headers.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: ClientWithMiddleware,
    upload_client: ClientWithMiddleware,
    semaphore: Arc<Semaphore>,
    endpoint: Url,
    project: String,
    fallback: Arc<CookieFallback>,
}

impl ApiClient {
    pub fn new(config: &Config, fallback: Arc<CookieFallback>) -> GatewayResult<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        let mut builder = ClientBuilder::new(client.clone());
        if config.retries() > 0 {
            let retry_policy =
                ExponentialBackoff::builder().build_with_max_retries(config.retries());
            builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
        }

        Ok(Self {
            client: builder.build(),
            // Multipart bodies cannot be cloned, so uploads skip the retry layer.
            upload_client: ClientBuilder::new(client).build(),
            semaphore: Arc::new(Semaphore::new(config.limit().max(1))),
            endpoint: config.endpoint().clone(),
            project: config.project().to_string(),
            fallback,
        })
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn fallback(&self) -> &Arc<CookieFallback> {
        &self.fallback
    }

    pub fn url(&self, path: &str) -> GatewayResult<Url> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    pub fn request(&self, method: Method, path: &str) -> GatewayResult<RequestBuilder> {
        let url = self.url(path)?;
        debug!("{} {}", method, url);
        Ok(self.client.request(method, url))
    }

    pub fn upload_request(&self, path: &str) -> GatewayResult<RequestBuilder> {
        let url = self.url(path)?;
        debug!("POST {} (upload)", url);
        Ok(self.upload_client.request(Method::POST, url))
    }

    async fn permit(&self) -> GatewayResult<SemaphorePermit<'_>> {
        self.semaphore
            .acquire()
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))
    }

    async fn wrap_request(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder
            .header(PROJECT_HEADER, &self.project)
            .header(RESPONSE_FORMAT_HEADER, RESPONSE_FORMAT)
            .header(header::ACCEPT, "application/json");
        match self.fallback.get().await {
            Some(cookies) => builder.header(FALLBACK_HEADER, cookies),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> GatewayResult<Response> {
        let _permit = self.permit().await?;
        let response = self.wrap_request(builder).await.send().await?;
        self.remember_fallback(&response).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await?;
        let err = GatewayError::from_response(status, &body);
        debug!("{} -> {}", status, err);
        Err(err)
    }

    async fn remember_fallback(&self, response: &Response) -> GatewayResult<()> {
        let Some(value) = response.headers().get(FALLBACK_HEADER) else {
            return Ok(());
        };
        match value.to_str() {
            Ok(cookies) => self.fallback.store(cookies.to_string()).await,
            Err(_) => {
                debug!("Ignoring non-text session fallback header");
                Ok(())
            }
        }
    }

    pub async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> GatewayResult<T> {
        let response = self.execute(builder).await?;
        let url = response.url().clone();
        let body = response.bytes().await?;

        if log_enabled!(log::Level::Trace) {
            if let Ok(value) = serde_json::from_slice::<Value>(&body) {
                trace!(
                    "{} {}",
                    url,
                    serde_json::to_string_pretty(&value).unwrap_or_default()
                );
            }
        }

        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn empty(&self, builder: RequestBuilder) -> GatewayResult<()> {
        self.execute(builder).await?;
        Ok(())
    }
}

/// Client for an Appwrite-compatible backend, implementing auth, database and storage.
#[derive(Debug, Clone)]
pub struct AppwriteClient {
    api: ApiClient,
}

impl AppwriteClient {
    pub fn new(config: &Config, fallback: Arc<CookieFallback>) -> GatewayResult<Self> {
        Ok(Self {
            api: ApiClient::new(config, fallback)?,
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendIds;

    fn client(endpoint: &str) -> ApiClient {
        let config = Config::new(Url::parse(endpoint).unwrap(), "mingle", BackendIds::default());
        ApiClient::new(&config, Arc::new(CookieFallback::default())).unwrap()
    }

    #[test]
    fn joins_paths_onto_versioned_endpoint() {
        let api = client("https://backend.example/v1");
        assert_eq!(
            api.url("/account").unwrap().as_str(),
            "https://backend.example/v1/account"
        );

        let api = client("https://backend.example/v1/");
        assert_eq!(
            api.url("/account/sessions/current").unwrap().as_str(),
            "https://backend.example/v1/account/sessions/current"
        );
    }

    #[test]
    fn segments_are_percent_encoded() {
        assert_eq!(segment("a b/c"), "a%20b%2Fc");
        assert_eq!(segment("posts"), "posts");
    }
}
