//! HTTP quote lookup with a two-source fallback chain.
//!
//! Tries the advice API first, then the quotable API, then a random entry
//! from the built-in table, so a result line always comes back.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use mycmd_core::quote::{random_local_quote, Quote, QuoteService};

const ADVICE_URL: &str = "https://api.adviceslip.com/advice";
const QUOTABLE_URL: &str = "https://api.quotable.io/random";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct AdviceSlipResponse {
    slip: AdviceSlip,
}

#[derive(Debug, Deserialize)]
struct AdviceSlip {
    advice: String,
}

#[derive(Debug, Deserialize)]
struct QuotableResponse {
    content: String,
    author: String,
}

/// Quote service backed by the public quote APIs.
#[derive(Clone)]
pub struct HttpQuoteService {
    client: Client,
}

impl HttpQuoteService {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    async fn fetch_advice(&self) -> reqwest::Result<Quote> {
        let response: AdviceSlipResponse = self
            .client
            .get(ADVICE_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(Quote::new(response.slip.advice, "Daily Wisdom"))
    }

    async fn fetch_quotable(&self) -> reqwest::Result<Quote> {
        let response: QuotableResponse = self
            .client
            .get(QUOTABLE_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(Quote::new(response.content, response.author))
    }
}

impl Default for HttpQuoteService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteService for HttpQuoteService {
    async fn fetch(&self) -> Quote {
        match self.fetch_advice().await {
            Ok(quote) => return quote,
            Err(err) => debug!(%err, "advice API failed, trying quotable"),
        }
        match self.fetch_quotable().await {
            Ok(quote) => quote,
            Err(err) => {
                debug!(%err, "both quote APIs failed, using local table");
                random_local_quote()
            }
        }
    }
}
