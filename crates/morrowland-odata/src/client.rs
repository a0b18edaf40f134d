use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ODataConfig;
use crate::records::ODataCollection;

#[derive(Debug, Error)]
pub enum ODataError {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{url} answered {status}")]
  Status { status: u16, url: String },

  #[error("could not decode response from {url}: {message}")]
  Decode { url: String, message: String },

  #[error("invalid configuration: {0}")]
  Config(String),
}

/// Opciones de sistema OData (`$top`, `$orderby`, `$select`).
#[derive(Debug, Clone, Default)]
pub struct QueryOptions<'a> {
  pub top: Option<u32>,
  pub orderby: Option<&'a str>,
  pub select: Option<&'a str>,
}

/// Cliente HTTP mínimo para colecciones OData V4.
pub struct ODataClient {
  client: reqwest::Client,
  service_url: String,
}

impl ODataClient {
  pub fn new(config: &ODataConfig) -> Result<Self, ODataError> {
    let client = reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
    Ok(Self { client, service_url: config.service_url.trim_end_matches('/').to_string() })
  }

  /// URL completa de una entidad con sus opciones de consulta.
  pub fn collection_url(&self, entity: &str, options: &QueryOptions<'_>) -> Result<Url, ODataError> {
    let raw = format!("{}/{}", self.service_url, entity.trim_start_matches('/'));
    let mut url = Url::parse(&raw).map_err(|e| ODataError::Config(format!("{raw}: {e}")))?;

    {
      let mut pairs = url.query_pairs_mut();
      if let Some(top) = options.top {
        pairs.append_pair("$top", &top.to_string());
      }
      if let Some(orderby) = options.orderby {
        pairs.append_pair("$orderby", orderby);
      }
      if let Some(select) = options.select {
        pairs.append_pair("$select", select);
      }
    }
    // query_pairs_mut deja un "?" colgando si no se añadió nada
    if url.query() == Some("") {
      url.set_query(None);
    }

    Ok(url)
  }

  /// GET de una colección; devuelve el contenido de `value`.
  pub async fn fetch_collection<T: DeserializeOwned>(
    &self,
    entity: &str,
    options: &QueryOptions<'_>,
  ) -> Result<Vec<T>, ODataError> {
    let url = self.collection_url(entity, options)?;
    info!("Fetching OData from: {}", url);

    let response = self.client.get(url.clone()).header("Accept", "application/json").send().await?;

    let status = response.status();
    if !status.is_success() {
      return Err(ODataError::Status { status: status.as_u16(), url: url.to_string() });
    }

    let body = response.bytes().await?;
    let collection: ODataCollection<T> = serde_json::from_slice(&body)
      .map_err(|e| ODataError::Decode { url: url.to_string(), message: e.to_string() })?;

    debug!(entity, rows = collection.value.len(), "OData collection received");
    Ok(collection.value)
  }
}
