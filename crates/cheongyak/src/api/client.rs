use super::models::Paginated;
use super::{FetchError, UnitDetail, UnitPage, UnitSource, UnitSummary};
use crate::config::ApiConfig;
use crate::listings::{api_query, FilterSelection};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

const UNITS_PATH: &str = "/api/units/";

/// `UnitSource` backed by the units REST API. Every call goes upstream; there
/// is no cache and no retry.
#[derive(Debug, Clone)]
pub struct HttpUnitSource {
    client: Client,
    base_url: Url,
}

impl HttpUnitSource {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| FetchError::Transport {
                resource: "http client".to_string(),
                message: err.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Full upstream URL for a listing query, as `fetch_units` requests it.
    pub fn units_url(&self, selection: &FilterSelection, page_size: u32) -> Result<Url, FetchError> {
        let mut url = self.endpoint("units", UNITS_PATH)?;
        url.query_pairs_mut()
            .extend_pairs(api_query(selection, page_size));
        Ok(url)
    }

    fn endpoint(&self, resource: &str, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|err| FetchError::Transport {
                resource: resource.to_string(),
                message: format!("invalid endpoint: {err}"),
            })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        request: RequestBuilder,
    ) -> Result<T, FetchError> {
        let response = request.send().await.map_err(|err| {
            warn!(resource, error = %err, "units API unreachable");
            FetchError::Transport {
                resource: resource.to_string(),
                message: err.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(resource, %status, "units API returned an error status");
            return Err(FetchError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|err| {
            warn!(resource, error = %err, "units API payload did not decode");
            FetchError::Decode {
                resource: resource.to_string(),
                message: err.to_string(),
            }
        })
    }
}

#[async_trait]
impl UnitSource for HttpUnitSource {
    async fn fetch_units(
        &self,
        selection: &FilterSelection,
        page_size: u32,
    ) -> Result<UnitPage, FetchError> {
        let url = self.units_url(selection, page_size)?;
        debug!(%url, "fetching units");

        let payload: Paginated<UnitSummary> =
            self.get_json("units", self.client.get(url)).await?;
        Ok(payload.into_page())
    }

    async fn fetch_unit(&self, unit_id: u64) -> Result<UnitDetail, FetchError> {
        let resource = format!("unit {unit_id}");
        let url = self.endpoint(&resource, &format!("{UNITS_PATH}{unit_id}/"))?;
        debug!(%url, "fetching unit detail");

        self.get_json(&resource, self.client.get(url)).await
    }
}
