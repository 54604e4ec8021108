use serde::{Deserialize, Serialize};

use crate::error::QuoteError;

/// A single USD/BRL observation as reported by the quote provider.
///
/// Numeric values are kept as the provider's strings so that what gets
/// stored is exactly what was received.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExchangeRate {
    pub code: String,
    pub codein: String,
    pub name: String,
    pub high: String,
    pub low: String,
    #[serde(rename = "varBid")]
    pub var_bid: String,
    #[serde(rename = "pctChange")]
    pub pct_change: String,
    pub bid: String,
    pub ask: String,
    // Provider-side metadata, not persisted.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub create_date: String,
}

impl ExchangeRate {
    /// Fails with [`QuoteError::MissingField`] for the first persisted field
    /// that is empty.
    pub fn ensure_complete(&self) -> Result<(), QuoteError> {
        let fields = [
            ("code", &self.code),
            ("codein", &self.codein),
            ("name", &self.name),
            ("high", &self.high),
            ("low", &self.low),
            ("varBid", &self.var_bid),
            ("pctChange", &self.pct_change),
            ("bid", &self.bid),
            ("ask", &self.ask),
        ];

        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some(&(name, _)) => Err(QuoteError::MissingField(name)),
            None => Ok(()),
        }
    }
}
