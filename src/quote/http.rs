//! HTTP pricing service.

use reqwest::blocking::Client;

use crate::error::DiamondError;
use crate::quote::{parse_response, PriceResponse, PricingService, SubmissionPayload};

pub const DEFAULT_PRICING_URL: &str = "http://localhost:8080/app/calculate/diamond";

/// Posts the submission as a `data=<json>` form field and parses the JSON reply.
#[derive(Debug, Clone)]
pub struct HttpPricingService {
    client: Client,
    endpoint: String,
}

impl HttpPricingService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PricingService for HttpPricingService {
    fn price(&self, payload: &SubmissionPayload) -> Result<PriceResponse, DiamondError> {
        let data = payload.to_json()?;
        tracing::debug!(endpoint = %self.endpoint, bytes = data.len(), "posting pricing request");

        let resp = self
            .client
            .post(&self.endpoint)
            .form(&[("data", data.as_str())])
            .send()
            .map_err(|e| DiamondError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(DiamondError::Transport(format!(
                "pricing endpoint answered with status {}",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| DiamondError::Transport(format!("failed to read pricing response: {e}")))?;

        parse_response(&body)
    }
}
