use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::QuoteError, exchange_rate::ExchangeRate};

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rate(&self) -> Result<ExchangeRate, QuoteError>;
}

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "USDBRL")]
    usdbrl: ExchangeRate,
}

/// Reads the `USDBRL` object out of an AwesomeAPI `json/last` payload.
pub fn parse_quote(body: &[u8]) -> Result<ExchangeRate, QuoteError> {
    let envelope: QuoteEnvelope = serde_json::from_slice(body)?;
    envelope.usdbrl.ensure_complete()?;
    Ok(envelope.usdbrl)
}

/// Fetches the current quote over HTTP. Deadlines are applied by the caller.
pub struct AwesomeApiProvider {
    client: Client,
    url: String,
}

impl AwesomeApiProvider {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl RateProvider for AwesomeApiProvider {
    async fn fetch_rate(&self) -> Result<ExchangeRate, QuoteError> {
        debug!("Requesting quote from {}", self.url);
        let resp = self.client.get(&self.url).send().await?;
        if !resp.status().is_success() {
            return Err(QuoteError::ProviderStatus(resp.status()));
        }

        let body = resp.bytes().await?;
        parse_quote(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MOCK_JSON: &str = r#"{
        "USDBRL": {
            "code": "USD",
            "codein": "BRL",
            "name": "Dólar Americano/Real Brasileiro",
            "high": "5.4512",
            "low": "5.3987",
            "varBid": "0.0123",
            "pctChange": "0.23",
            "bid": "5.4328",
            "ask": "5.4338",
            "timestamp": "1718049600",
            "create_date": "2024-06-10 17:00:00"
        }
    }"#;

    async fn create_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/json/last/USD-BRL"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider_for(server: &MockServer) -> AwesomeApiProvider {
        AwesomeApiProvider::new(&format!("{}/json/last/USD-BRL", server.uri()))
    }

    #[tokio::test]
    async fn test_fetch_rate() {
        let mock_server = create_mock_server(200, MOCK_JSON).await;

        let rate = provider_for(&mock_server).fetch_rate().await.unwrap();

        assert_eq!(rate.code, "USD");
        assert_eq!(rate.codein, "BRL");
        assert_eq!(rate.name, "Dólar Americano/Real Brasileiro");
        assert_eq!(rate.high, "5.4512");
        assert_eq!(rate.low, "5.3987");
        assert_eq!(rate.var_bid, "0.0123");
        assert_eq!(rate.pct_change, "0.23");
        assert_eq!(rate.bid, "5.4328");
        assert_eq!(rate.ask, "5.4338");
        assert_eq!(rate.timestamp, "1718049600");
        assert_eq!(rate.create_date, "2024-06-10 17:00:00");
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let mock_server = create_mock_server(200, "<html>maintenance</html>").await;

        let err = provider_for(&mock_server).fetch_rate().await.unwrap_err();

        assert!(matches!(err, QuoteError::Payload(_)));
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn test_missing_pair_key() {
        let mock_server = create_mock_server(200, r#"{"EURBRL": {}}"#).await;

        let err = provider_for(&mock_server).fetch_rate().await.unwrap_err();

        assert!(matches!(err, QuoteError::Payload(_)));
    }

    #[tokio::test]
    async fn test_error_status() {
        let mock_server = create_mock_server(429, r#"{"status":429}"#).await;

        let err = provider_for(&mock_server).fetch_rate().await.unwrap_err();

        assert!(matches!(err, QuoteError::ProviderStatus(s) if s.as_u16() == 429));
    }

    #[tokio::test]
    async fn test_unreachable_provider() {
        let mock_server = MockServer::start().await;
        let provider = provider_for(&mock_server);
        drop(mock_server);

        let err = provider.fetch_rate().await.unwrap_err();

        assert!(matches!(err, QuoteError::Provider(_)));
    }

    #[test]
    fn test_parse_quote_ignores_extra_keys() {
        let body = MOCK_JSON.replace(r#""code": "USD","#, r#""code": "USD", "extra": "x","#);

        let rate = parse_quote(body.as_bytes()).unwrap();

        assert_eq!(rate.bid, "5.4328");
    }

    #[test]
    fn test_parse_quote_rejects_empty_bid() {
        let body = MOCK_JSON.replace(r#""bid": "5.4328""#, r#""bid": """#);

        let err = parse_quote(body.as_bytes()).unwrap_err();

        assert!(matches!(err, QuoteError::MissingField("bid")));
    }
}
