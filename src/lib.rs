pub mod client;
pub mod config;
pub mod error;
pub mod exchange_rate;
pub mod provider;
pub mod quote;
pub mod server;
pub mod store;
