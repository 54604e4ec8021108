use std::{path::PathBuf, time::Duration};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_PROVIDER_URL: &str = "https://economia.awesomeapi.com.br/json/last/USD-BRL";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(200);
pub const DEFAULT_DATABASE_PATH: &str = "./server/db/exchanges.db";
// Tighter than a typical SQLite insert on disk.
pub const DEFAULT_PERSIST_TIMEOUT: Duration = Duration::from_millis(10);

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/cotacao";
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_millis(300);
pub const DEFAULT_OUTPUT_PATH: &str = "./client/cotacao.txt";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub provider_url: String,
    pub fetch_timeout: Duration,
    pub database_path: PathBuf,
    pub persist_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            persist_timeout: DEFAULT_PERSIST_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub timeout: Duration,
    pub output_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server_url: DEFAULT_SERVER_URL.to_string(),
            timeout: DEFAULT_CLIENT_TIMEOUT,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}
