use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode, Url};

use crate::config::ExternalIdConfig;
use crate::models::{LookupContext, LookupResponse};
use crate::utils::{ExternalIdError, ExternalIdResult};

/// A source of person data for external national IDs.
#[async_trait]
pub trait NationalIdLookup: Send + Sync {
    async fn lookup(&self, external_id: &str, context: &LookupContext)
        -> ExternalIdResult<LookupResponse>;
}

/// Run one lookup, giving up once `timeout` has elapsed since issue.
///
/// No retry is attempted; the user can re-trigger by editing the ID.
pub async fn lookup_with_timeout(
    client: &dyn NationalIdLookup,
    external_id: &str,
    context: &LookupContext,
    timeout: Duration,
) -> ExternalIdResult<LookupResponse> {
    match tokio::time::timeout(timeout, client.lookup(external_id, context)).await {
        Ok(result) => result,
        Err(_) => Err(ExternalIdError::TimedOut(timeout.as_millis() as u64)),
    }
}

/// Lookup client for the external national ID REST API.
#[derive(Clone)]
pub struct HttpLookupClient {
    client: Client,
    base_url: Url,
    api_key_header: Option<(String, String)>,
}

impl HttpLookupClient {
    pub fn new(config: &ExternalIdConfig) -> ExternalIdResult<Self> {
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| ExternalIdError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ExternalIdError::InvalidUrl(config.base_url.clone()));
        }

        // Backstop only: lookup_with_timeout owns the user-facing deadline
        let client = Client::builder()
            .timeout(config.lookup_timeout + Duration::from_secs(1))
            .build()?;

        Ok(HttpLookupClient {
            client,
            base_url,
            api_key_header: config
                .api_key_header()
                .map(|(header, key)| (header.to_string(), key.to_string())),
        })
    }

    fn lookup_url(&self, external_id: &str, context: &LookupContext) -> ExternalIdResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ExternalIdError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(external_id.trim());

        {
            let mut query = url.query_pairs_mut();
            if let Some(locale) = &context.locale {
                query.append_pair("locale", locale);
            }
            if let Some(currency) = &context.currency {
                query.append_pair("currency", currency);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        Ok(url)
    }
}

#[async_trait]
impl NationalIdLookup for HttpLookupClient {
    async fn lookup(
        &self,
        external_id: &str,
        context: &LookupContext,
    ) -> ExternalIdResult<LookupResponse> {
        let url = self.lookup_url(external_id, context)?;
        debug!("Looking up external ID at {}", url.path());

        let mut request = self.client.get(url);
        if let Some((header, key)) = &self.api_key_header {
            request = request.header(header.as_str(), key.as_str());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ExternalIdError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalIdError::Http { status, body });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ExternalIdError::Decode(e.to_string()))
    }
}
