use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use beleg_core::RawExtraction;
use beleg_lookup::HttpCategoryLookup;
use beleg_normalize::{NormalizeConfig, ProductCatalog, ReceiptNormalizer};

/// Normalize a vision-model receipt extraction against the domain rules
/// and print the cleaned record as JSON.
#[derive(Debug, Parser)]
#[command(name = "beleg", version)]
struct Args {
    /// Path to the raw extraction JSON produced by the vision call.
    #[arg(long)]
    extraction: PathBuf,

    /// Path to the OCR text of the same receipt (date-recovery evidence).
    #[arg(long)]
    ocr_text: Option<PathBuf>,

    /// Product catalog CSV (`name,category`) for the retailer fallback.
    #[arg(long, default_value = "products/ikea_products.csv")]
    catalog: PathBuf,

    /// Base URL of the remote lookup service. Omit to run fully offline.
    #[arg(long)]
    lookup_url: Option<String>,

    /// Optional TOML config overriding retailer/threshold/aliases.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            NormalizeConfig::from_toml(&content)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => NormalizeConfig::default(),
    };

    let catalog = Arc::new(
        ProductCatalog::from_path(&args.catalog)
            .with_context(|| format!("Failed to load catalog {}", args.catalog.display()))?,
    );
    tracing::info!("Loaded {} catalog products", catalog.len());

    let extraction_json = std::fs::read_to_string(&args.extraction)
        .with_context(|| format!("Failed to read extraction {}", args.extraction.display()))?;
    let raw: RawExtraction = serde_json::from_str(&extraction_json)
        .with_context(|| format!("Invalid extraction JSON in {}", args.extraction.display()))?;

    let recognized_text = match &args.ocr_text {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read OCR text {}", path.display()))?,
        None => String::new(),
    };

    let mut normalizer = ReceiptNormalizer::new(config, catalog);
    if let Some(url) = &args.lookup_url {
        normalizer = normalizer.with_remote(Box::new(HttpCategoryLookup::new(url.clone())));
    }

    let receipt = normalizer.normalize(&raw, &recognized_text).await;

    let output = if args.pretty {
        serde_json::to_string_pretty(&receipt)?
    } else {
        serde_json::to_string(&receipt)?
    };
    println!("{output}");
    Ok(())
}
