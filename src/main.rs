use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use skinmatch::api;
use skinmatch::catalog::{HttpSeedSource, InMemoryCatalog, Seeder};
use skinmatch::models::AppConfig;
use skinmatch::server;
use skinmatch::services::{spawn_refresher, HttpPriceFeed, PriceCache};

#[derive(Parser)]
#[command(name = "skinmatch")]
#[command(about = "Color-perception search and loadout composer for CS2 skins")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Build or resume the catalog from the public descriptor list
    Seed,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Skinmatch API",
        description = "Color-perception search and loadout composer for CS2 skins",
        version = "0.3.0",
        license(name = "MIT")
    ),
    paths(
        api::skins::handle_list,
        api::skins::handle_color_search,
        api::skins::handle_similar,
        api::loadout::handle_loadout,
        api::inventory::handle_inventory_match,
    ),
    components(schemas(
        api::SkinDto,
        api::LoadoutBody,
        api::LoadoutEntryDto,
        api::LoadoutResponse,
        api::MatchBody,
        api::MatchResponse,
    )),
    tags(
        (name = "Skins", description = "Catalog listing and color search"),
        (name = "Loadout", description = "Loadout composition"),
        (name = "Inventory", description = "Owned-item matching")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skinmatch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load(&cli.config);

    match cli.command {
        Commands::Serve => run_server(config).await,
        Commands::Seed => run_seed(config).await,
    }
}

async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let store: Arc<dyn skinmatch::catalog::CatalogStore> =
        match InMemoryCatalog::load(&config.catalog_path) {
            Ok(catalog) => Arc::new(catalog),
            Err(e) => {
                tracing::warn!(%e, path = %config.catalog_path.display(),
                    "No catalog loaded; run `skinmatch seed` to build one");
                Arc::new(InMemoryCatalog::new())
            }
        };

    let prices = Arc::new(PriceCache::new());
    let feed = Arc::new(HttpPriceFeed::new(config.price_feed.url.clone()));
    spawn_refresher(Arc::clone(&prices), feed, config.price_feed.clone());

    let state = server::create_app_state(store, prices);
    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    tracing::info!(addr = %config.listen, "Skinmatch server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn run_seed(config: AppConfig) -> anyhow::Result<()> {
    // Resume from the existing catalog when present
    let catalog = match InMemoryCatalog::load(&config.catalog_path) {
        Ok(catalog) => catalog,
        Err(_) => InMemoryCatalog::new(),
    };
    let store = Arc::new(catalog);

    let source = Arc::new(HttpSeedSource::new(config.seed.source_url.clone()));
    let seeder = Seeder::new(
        source,
        Arc::clone(&store) as Arc<dyn skinmatch::catalog::CatalogStore>,
        config.seed.concurrency,
    );
    let summary = seeder.run().await?;
    store.save(&config.catalog_path).await?;

    tracing::info!(
        total = summary.total,
        seeded = summary.seeded,
        skipped = summary.skipped,
        placeholders = summary.placeholders,
        "Catalog written"
    );
    Ok(())
}
