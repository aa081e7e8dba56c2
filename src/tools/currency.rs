//! `convert_currency` tool backed by the Amdoren currency-rate API.
//!
//! Every lookup failure (transport, non-2xx, error payload, missing rate)
//! comes back as [`ToolError::RemoteLookup`]. Nothing is retried.

use super::registry::{ToolDefinition, ToolHandler};
use super::schema::{ParamDef, ParamType, ToolArgs, ToolSchema};
use crate::types::{Config, Result, ToolError};
use async_trait::async_trait;
use serde_json::{Number, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

pub const CONVERT_CURRENCY: &str = "convert_currency";

/// Source of exchange rates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Units of `to` per one unit of `from`.
    async fn rate(&self, from: &str, to: &str) -> std::result::Result<f64, ToolError>;
}

// =============================================================================
// Amdoren client
// =============================================================================

/// HTTP client for `GET {base}/currency.php?api_key=..&from=..&to=..`.
#[derive(Clone)]
pub struct AmdorenClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AmdorenClient {
    pub fn new(config: &Config, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.currency.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

impl fmt::Debug for AmdorenClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmdorenClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RateProvider for AmdorenClient {
    async fn rate(&self, from: &str, to: &str) -> std::result::Result<f64, ToolError> {
        let url = format!("{}/currency.php", self.base_url);
        debug!(%url, from, to, "requesting exchange rate");

        // without_url() keeps the api_key query parameter out of messages
        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("from", from), ("to", to)])
            .send()
            .await
            .map_err(|e| ToolError::remote(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ToolError::remote(format!("failed to read response: {}", e.without_url())))?;

        if !status.is_success() {
            return Err(ToolError::remote(format!("HTTP {}: {}", status, body.trim())));
        }

        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| ToolError::remote(format!("malformed response: {}", e)))?;

        parse_rate(&payload)
    }
}

/// Extract the rate from an Amdoren payload.
///
/// `error` signals failure when it is a non-empty string, `true`, or a
/// non-zero number (the live API sends `0` on success).
pub fn parse_rate(payload: &Value) -> std::result::Result<f64, ToolError> {
    let failed = match payload.get("error") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|x| x != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    };

    if failed {
        let message = match payload.get("error") {
            Some(Value::String(s)) => s.clone(),
            other => payload
                .get("error_message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("error {}", other.cloned().unwrap_or(Value::Null))),
        };
        return Err(ToolError::RemoteLookup(message));
    }

    payload
        .get("amount")
        .and_then(Value::as_f64)
        .ok_or_else(|| ToolError::remote("response has no numeric amount"))
}

/// `"{amount} {from} is approximately {converted:.2} {to}."`
///
/// The amount prints in its shortest form, so `100.0` reads as `100`. A
/// converted value beyond the f64 range reads as `Infinity`.
pub fn format_conversion(amount: &Number, from: &str, to: &str, rate: f64) -> String {
    let value = amount.as_f64().unwrap_or(f64::NAN);
    let shown = if amount.is_f64() {
        value.to_string()
    } else {
        amount.to_string()
    };

    let converted = rate * value;
    let converted = if converted.is_finite() {
        format!("{:.2}", converted)
    } else if converted.is_nan() {
        "NaN".to_string()
    } else if converted > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    };

    format!("{} {} is approximately {} {}.", shown, from, converted, to)
}

// =============================================================================
// Tool
// =============================================================================

/// Callback for `convert_currency`.
pub struct CurrencyConverter {
    rates: Arc<dyn RateProvider>,
}

impl CurrencyConverter {
    pub fn new(rates: Arc<dyn RateProvider>) -> Self {
        Self { rates }
    }
}

impl fmt::Debug for CurrencyConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrencyConverter").finish_non_exhaustive()
    }
}

#[async_trait]
impl ToolHandler for CurrencyConverter {
    async fn call(&self, args: ToolArgs) -> std::result::Result<Value, ToolError> {
        let from = args.string("from")?;
        let to = args.string("to")?;
        let amount = args.number("amount")?;
        info!(from, to, %amount, "converting currency");

        let rate = self.rates.rate(from, to).await?;
        Ok(Value::String(format_conversion(amount, from, to, rate)))
    }
}

pub fn convert_currency_tool(rates: Arc<dyn RateProvider>) -> ToolDefinition {
    ToolDefinition::new(
        CONVERT_CURRENCY,
        "Converts an amount from one currency to another using the Amdoren API.",
        ToolSchema::new(vec![
            ParamDef::new("from", ParamType::String, "3-letter source currency code like USD"),
            ParamDef::new("to", ParamType::String, "3-letter target currency code like EUR"),
            ParamDef::new("amount", ParamType::Number, "Amount to convert"),
        ]),
        Arc::new(CurrencyConverter::new(rates)),
    )
}
