use std::{net::TcpListener, sync::Arc};

use actix_web::{App, HttpResponse, HttpServer, dev::Server, middleware::Logger, web};
use anyhow::{Context, Result};
use log::{info, warn};

use crate::{
    config::ServerConfig,
    error::QuoteError,
    provider::AwesomeApiProvider,
    quote::QuoteService,
    store::{ObservationStore, SqliteStore},
};

async fn cotacao(service: web::Data<QuoteService>) -> Result<HttpResponse, QuoteError> {
    let bid = service.latest_bid().await.inspect_err(|e| {
        if e.is_timeout() {
            warn!("Quote request hit a deadline: {e}");
        } else {
            warn!("Quote request failed: {e}");
        }
    })?;

    Ok(HttpResponse::Ok().json(bid))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/cotacao", web::get().to(cotacao));
}

/// Starts serving on an already bound listener. Every worker gets its own
/// provider client; the store is shared.
pub fn listen(
    listener: TcpListener,
    config: &ServerConfig,
    store: Arc<dyn ObservationStore>,
) -> Result<Server> {
    let config = config.clone();
    let server = HttpServer::new(move || {
        let provider = Arc::new(AwesomeApiProvider::new(&config.provider_url));
        let service = QuoteService::from_config(&config, provider, Arc::clone(&store));

        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(service))
            .configure(configure)
    })
    .listen(listener)
    .context("Failed to attach HTTP listener")?
    .run();

    Ok(server)
}

pub async fn run(config: ServerConfig) -> Result<()> {
    let store = Arc::new(SqliteStore::open(&config.database_path).await?);

    let listener = TcpListener::bind(&config.bind_address)
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Serving /cotacao on {}", listener.local_addr()?);

    listen(listener, &config, Arc::clone(&store) as Arc<dyn ObservationStore>)?
        .await
        .context("HTTP server stopped with an error")?;

    store.close().await;
    info!("Server shut down");
    Ok(())
}
