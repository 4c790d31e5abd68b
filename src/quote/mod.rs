//! Quote submission: payload, pricing service seam, and response handling.
//!
//! The pricing service is an opaque RPC. A request carries every attribute
//! value plus the raw advanced-option indices; a response carries a price
//! range and a normalized attributes object. The submitter turns the
//! response into the query string for the quote form and hands it to a
//! `QuoteForm`; it never renders the form itself.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{AdvancedKind, AttributeKey, Shape};
use crate::error::DiamondError;
use crate::model::AttributeModel;

pub mod format;
pub mod http;
pub mod pending;

pub use http::HttpPricingService;
pub use pending::{BackgroundQuotes, CompletedQuote};

/// Everything the pricing service needs, captured at submit time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    pub shape: Shape,
    pub carat: f64,
    pub color: f64,
    pub clarity: f64,
    pub cut: f64,
    pub color_med: f64,
    pub clarity_med: f64,
    pub quality_small: f64,
    pub adv_raw: AdvancedRaw,
}

/// Raw advanced-option indices; -1 means nothing was picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvancedRaw {
    pub fluorescence: i64,
    pub laser: i64,
    pub brown: i64,
    pub fracture: i64,
    pub inclusion: i64,
}

impl SubmissionPayload {
    pub fn from_model(model: &AttributeModel) -> Self {
        let adv = &model.advanced;
        Self {
            shape: model.shape,
            carat: model.value(AttributeKey::Carat),
            color: model.value(AttributeKey::Color),
            clarity: model.value(AttributeKey::Clarity),
            cut: model.value(AttributeKey::Cut),
            color_med: model.value(AttributeKey::ColorMedium),
            clarity_med: model.value(AttributeKey::ClarityMedium),
            quality_small: model.value(AttributeKey::QualitySmall),
            adv_raw: AdvancedRaw {
                fluorescence: adv.raw_index(AdvancedKind::Fluorescence),
                laser: adv.raw_index(AdvancedKind::LaserDrilled),
                brown: adv.raw_index(AdvancedKind::BrownTint),
                fracture: adv.raw_index(AdvancedKind::FractureFilled),
                inclusion: adv.raw_index(AdvancedKind::InclusionType),
            },
        }
    }

    pub fn to_json(&self) -> Result<String, DiamondError> {
        serde_json::to_string(self)
            .map_err(|e| DiamondError::Transport(format!("failed to encode submission: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceRange {
    #[serde(deserialize_with = "de_amount")]
    pub low: f64,
    #[serde(deserialize_with = "de_amount")]
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceResponse {
    pub range: PriceRange,
    /// Normalized attributes; older services call this `atts`.
    #[serde(alias = "atts", default)]
    pub attributes: Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

fn de_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => s
            .trim()
            .replace(',', "")
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid amount '{s}': {e}"))),
    }
}

/// Parse a pricing response body.
pub fn parse_response(body: &str) -> Result<PriceResponse, DiamondError> {
    serde_json::from_str(body).map_err(|e| DiamondError::PayloadParse(e.to_string()))
}

/// The RPC seam to the pricing service.
pub trait PricingService {
    fn price(&self, payload: &SubmissionPayload) -> Result<PriceResponse, DiamondError>;
}

/// Price outcome as shown to the shopper.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceSummary {
    Range { low: f64, high: f64 },
    /// The service answered `{low: 0, high: 0}`.
    NoMatch,
}

impl PriceSummary {
    pub fn from_range(range: &PriceRange) -> Self {
        if range.low == 0.0 && range.high == 0.0 {
            PriceSummary::NoMatch
        } else {
            PriceSummary::Range {
                low: range.low,
                high: range.high,
            }
        }
    }

    pub fn text(&self) -> String {
        match self {
            PriceSummary::Range { low, high } => {
                format!("{} to {}", format::format_currency(*low), format::format_currency(*high))
            }
            PriceSummary::NoMatch => format::NO_MATCH_MESSAGE.to_string(),
        }
    }
}

/// A formatted quote, ready for the quote form.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub summary: PriceSummary,
    pub price_range: String,
    pub query: String,
    pub url: String,
}

impl Quote {
    pub fn from_response(response: &PriceResponse, form_url: &str) -> Self {
        let summary = PriceSummary::from_range(&response.range);
        let price_range = summary.text();
        let query = format::query_string(&response.attributes, &price_range);
        let url = format::form_url(form_url, &query);
        Self {
            summary,
            price_range,
            query,
            url,
        }
    }

    /// `key=value` pairs of the query string, in order.
    pub fn fields(&self) -> Vec<(&str, &str)> {
        self.query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .collect()
    }
}

/// The external form that collects contact details for a quote.
pub trait QuoteForm {
    fn open(&mut self, quote: &Quote);
}

#[derive(Debug, Clone)]
pub struct QuoteSubmitter<S> {
    service: S,
    form_url: String,
}

impl<S: PricingService> QuoteSubmitter<S> {
    pub fn new(service: S, form_url: impl Into<String>) -> Self {
        Self {
            service,
            form_url: form_url.into(),
        }
    }

    /// Price a captured payload without opening the form.
    pub fn quote(&self, payload: &SubmissionPayload) -> Result<Quote, DiamondError> {
        let response = self.service.price(payload)?;
        let quote = Quote::from_response(&response, &self.form_url);
        tracing::info!(price_range = %quote.price_range, "quote received");
        Ok(quote)
    }

    /// Price the current selection and open the quote form.
    ///
    /// On error nothing is opened and the model is untouched.
    pub fn submit(&self, model: &AttributeModel, form: &mut impl QuoteForm) -> Result<Quote, DiamondError> {
        let payload = SubmissionPayload::from_model(model);
        tracing::info!(shape = ?payload.shape, carat = payload.carat, "submitting selection for pricing");
        let quote = self.quote(&payload).inspect_err(|err| {
            tracing::warn!(error = %err, "pricing failed");
        })?;
        form.open(&quote);
        Ok(quote)
    }
}
