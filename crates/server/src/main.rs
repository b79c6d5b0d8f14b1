//! Standalone fuzzy-category lookup service.
//!
//! Serves `GET /lookup?item_name=…&threshold=…` over a product catalog
//! loaded once at startup. The normalization pipeline consumes this endpoint
//! through `beleg_lookup::HttpCategoryLookup`.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use beleg_lookup::wire::CategoryResponse;
use beleg_normalize::{fuzzy, ProductCatalog, DEFAULT_THRESHOLD};

#[derive(Clone)]
struct ServerState {
    catalog: Arc<ProductCatalog>,
}

#[derive(Debug, Deserialize)]
struct LookupParams {
    #[serde(default)]
    item_name: String,
    threshold: Option<u8>,
}

fn router(catalog: Arc<ProductCatalog>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/lookup", get(lookup))
        .layer(TraceLayer::new_for_http())
        .with_state(ServerState { catalog })
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "beleg category lookup service. Use /lookup?item_name=..."
    }))
}

async fn lookup(
    State(state): State<ServerState>,
    Query(params): Query<LookupParams>,
) -> Json<CategoryResponse> {
    let threshold = params.threshold.unwrap_or(DEFAULT_THRESHOLD);
    Json(lookup_category(&state.catalog, &params.item_name, threshold))
}

/// Same scoring as the pipeline's local fallback, so the two call sites
/// agree on semantics. `matched_name` and `score` report the best candidate
/// even below the threshold; `category` only on a hit.
fn lookup_category(catalog: &ProductCatalog, item_name: &str, threshold: u8) -> CategoryResponse {
    let best = fuzzy::best_match(item_name, catalog.names());
    match best {
        Some(m) if m.score >= threshold => {
            let category = catalog.category(&m.name).map(str::to_string);
            CategoryResponse {
                item_name: item_name.to_string(),
                matched_name: Some(m.name),
                category,
                score: Some(m.score),
                found: true,
            }
        }
        Some(m) => CategoryResponse {
            item_name: item_name.to_string(),
            matched_name: Some(m.name),
            category: None,
            score: Some(m.score),
            found: false,
        },
        None => CategoryResponse {
            item_name: item_name.to_string(),
            matched_name: None,
            category: None,
            score: None,
            found: false,
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let catalog_path: PathBuf = std::env::var("BELEG_CATALOG")
        .unwrap_or_else(|_| "products/ikea_products.csv".to_string())
        .into();
    let addr = std::env::var("BELEG_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());

    let catalog = Arc::new(ProductCatalog::from_path(&catalog_path)?);
    tracing::info!(
        "Loaded {} products from {}",
        catalog.len(),
        catalog_path.display()
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Lookup service listening on {addr}");
    axum::serve(listener, router(catalog)).await?;
    Ok(())
}
