use std::{sync::Arc, time::Duration};

use awardboxd::{
    AppState, catalog::Catalog, config::Config, db, event_page::HttpEventFetcher, routes,
    tmdb::TmdbClient,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,awardboxd=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http =
        wreq::Client::builder().timeout(Duration::from_secs(config.tmdb_timeout_secs)).build()?;
    let fetcher =
        HttpEventFetcher::new(Duration::from_secs(config.event_fetch_timeout_secs))?;

    let db = db::connect_and_migrate(&config.database_url).await?;

    let tmdb = TmdbClient::new(
        http,
        config.tmdb_access_token.clone(),
        config.tmdb_base_url.clone(),
        config.tmdb_rps,
    );

    let state = Arc::new(AppState {
        catalog: Catalog::new(db),
        fetcher: Arc::new(fetcher),
        metadata: Arc::new(tmdb),
    });

    let app = routes::router(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
