use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use placement_api::config::Config;
use placement_api::db::create_pool;
use placement_api::routes::build_router;
use placement_api::scoring::{MatchRanker, SkillTaxonomy};
use placement_api::state::AppState;
use placement_api::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("placement_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Placement API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config).await?;
    let store = Arc::new(PgStore::new(pool));

    // Related-skill taxonomy: file override or built-in groups
    let taxonomy = match &config.skill_taxonomy_path {
        Some(path) => {
            let taxonomy = SkillTaxonomy::from_json_file(path)?;
            info!(path = %path, groups = taxonomy.len(), "Skill taxonomy loaded");
            taxonomy
        }
        None => SkillTaxonomy::default(),
    };
    let ranker = Arc::new(MatchRanker::new(Arc::new(taxonomy)));

    info!(
        threshold = config.scoring_parallel_threshold,
        workers = config.scoring_workers,
        "Batch scoring configured"
    );

    let state = AppState::new(store, ranker, &config);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the campus portal domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
