//! Enrichment over the agify, genderize and nationalize HTTP APIs.

use super::{Enricher, Enrichment};
use async_trait::async_trait;
use reqwest::Client;
use roster_config::EnrichmentConfig;
use roster_core::{RosterError, RosterResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

/// Genders below this probability are discarded.
const MIN_GENDER_PROBABILITY: f64 = 0.5;

/// Countries below this probability are discarded.
const MIN_COUNTRY_PROBABILITY: f64 = 0.1;

#[derive(Debug, Deserialize)]
struct AgifyResponse {
    age: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct GenderizeResponse {
    gender: Option<String>,
    #[serde(default)]
    probability: f64,
}

#[derive(Debug, Deserialize)]
struct NationalizeResponse {
    #[serde(default)]
    country: Vec<CountryGuess>,
}

#[derive(Debug, Deserialize)]
struct CountryGuess {
    country_id: String,
    probability: f64,
}

/// Runs the three lookups concurrently against the configured base URLs.
#[derive(Debug, Clone)]
pub struct HttpEnricher {
    client: Client,
    agify_url: String,
    genderize_url: String,
    nationalize_url: String,
}

impl HttpEnricher {
    /// Creates an enricher from configuration.
    pub fn new(config: &EnrichmentConfig) -> RosterResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RosterError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            agify_url: config.agify_url.trim_end_matches('/').to_string(),
            genderize_url: config.genderize_url.trim_end_matches('/').to_string(),
            nationalize_url: config.nationalize_url.trim_end_matches('/').to_string(),
        })
    }

    async fn lookup<T: DeserializeOwned>(
        &self,
        service: &'static str,
        base_url: &str,
        name: &str,
    ) -> RosterResult<T> {
        let response = self
            .client
            .get(base_url)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|e| RosterError::external(service, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RosterError::external(
                service,
                format!("returned status {}", status.as_u16()),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| RosterError::external(service, format!("invalid response: {e}")))
    }

    async fn age(&self, name: &str) -> RosterResult<Option<i32>> {
        let response: AgifyResponse = self.lookup("agify", &self.agify_url, name).await?;
        Ok(response.age.filter(|age| *age > 0))
    }

    async fn gender(&self, name: &str) -> RosterResult<Option<String>> {
        let response: GenderizeResponse =
            self.lookup("genderize", &self.genderize_url, name).await?;
        Ok(response
            .gender
            .filter(|g| !g.is_empty() && response.probability >= MIN_GENDER_PROBABILITY))
    }

    async fn nationality(&self, name: &str) -> RosterResult<Option<String>> {
        let response: NationalizeResponse =
            self.lookup("nationalize", &self.nationalize_url, name).await?;
        Ok(response
            .country
            .into_iter()
            .max_by(|a, b| a.probability.total_cmp(&b.probability))
            .filter(|best| best.probability >= MIN_COUNTRY_PROBABILITY)
            .map(|best| best.country_id))
    }
}

fn or_warn<T>(service: &str, result: RosterResult<Option<T>>) -> Option<T> {
    result.unwrap_or_else(|e| {
        warn!("{} lookup failed, leaving field unset: {}", service, e);
        None
    })
}

#[async_trait]
impl Enricher for HttpEnricher {
    async fn enrich(&self, first_name: &str) -> Enrichment {
        debug!("Enriching person data for: {}", first_name);

        let (age, gender, nationality) = tokio::join!(
            self.age(first_name),
            self.gender(first_name),
            self.nationality(first_name),
        );

        Enrichment {
            age: or_warn("Age", age),
            gender: or_warn("Gender", gender),
            nationality: or_warn("Nationality", nationality),
        }
    }
}
