use std::sync::Arc;

use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use shared::error::{ApiError, ApiResult, ErrorBody};
use tracing::warn;
use url::Url;

use crate::session::{Navigator, Route, TokenStore};

/// Authenticated HTTP gateway. Every call is normalized into
/// `Result<T, ApiError>`; transport details never leak past this boundary.
#[derive(Clone)]
pub struct Gateway {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl Gateway {
    pub fn new(base_url: Url, tokens: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            tokens,
            navigator,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn dispatch(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let builder = match self.tokens.load().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = builder.send().await.map_err(|err| {
            warn!("gateway: transport failure: {err}");
            ApiError::internal()
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("gateway: unauthorized response, clearing stored session");
            self.tokens.clear().await;
            self.navigator.navigate(Route::Login);
        }

        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        Err(body.into_api_error(status.as_u16()))
    }

    async fn dispatch_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = self.dispatch(builder).await?;
        response.json::<T>().await.map_err(|err| {
            warn!("gateway: invalid response body: {err}");
            ApiError::internal()
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ApiResult<T> {
        self.dispatch_json(self.http.get(self.endpoint(path)).query(query))
            .await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.dispatch_json(self.http.post(self.endpoint(path)).json(body))
            .await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        self.dispatch(self.http.post(self.endpoint(path)).json(body))
            .await
            .map(drop)
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        self.dispatch(self.http.put(self.endpoint(path)).json(body))
            .await
            .map(drop)
    }

    pub async fn patch<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        self.dispatch(self.http.patch(self.endpoint(path)).json(body))
            .await
            .map(drop)
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.dispatch(self.http.delete(self.endpoint(path)))
            .await
            .map(drop)
    }

    pub async fn post_multipart(&self, path: &str, form: multipart::Form) -> ApiResult<()> {
        self.dispatch(self.http.post(self.endpoint(path)).multipart(form))
            .await
            .map(drop)
    }

    pub async fn put_multipart(&self, path: &str, form: multipart::Form) -> ApiResult<()> {
        self.dispatch(self.http.put(self.endpoint(path)).multipart(form))
            .await
            .map(drop)
    }
}
