use reqwest::header::AUTHORIZATION;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    cache::{MatrixCache, NoCache},
    config::{MatrixLimits, RoutingClientParams},
    error::RoutingApiError,
    routing_api::error_message,
};

/// Client for the matrix and snap endpoints of an openrouteservice compatible API.
///
/// Requests are always issued one after the other.
pub struct RoutingClient<C = NoCache> {
    pub(crate) params: RoutingClientParams,
    pub(crate) cache: C,
    client: reqwest::Client,
}

impl RoutingClient<NoCache> {
    pub fn new(params: RoutingClientParams) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(params.timeout).build()?;

        Ok(Self {
            params,
            cache: NoCache,
            client,
        })
    }
}

impl<C> RoutingClient<C>
where
    C: MatrixCache,
{
    pub fn with_cache<T>(self, cache: T) -> RoutingClient<T>
    where
        T: MatrixCache,
    {
        RoutingClient {
            params: self.params,
            cache,
            client: self.client,
        }
    }

    pub fn params(&self) -> &RoutingClientParams {
        &self.params
    }

    pub(crate) fn limits(&self) -> MatrixLimits {
        self.params.limits
    }

    /// Posts `body` and decodes the response. An `error` payload is reported as
    /// an API error whatever the HTTP status.
    pub(crate) async fn post<B, R>(&self, url: &str, body: &B) -> Result<R, RoutingApiError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        debug!("RoutingClient: POST {}", url);

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, &self.params.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let payload = serde_json::from_str::<serde_json::Value>(&text).ok();

        if let Some(message) = payload.as_ref().and_then(error_message) {
            return Err(RoutingApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if !status.is_success() {
            return Err(RoutingApiError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
