use std::sync::Arc;

use chrono::NaiveDate;

use beleg_core::{NormalizedReceipt, RawExtraction, ReceiptItem};

use crate::catalog::ProductCatalog;
use crate::category::{CategoryLookup, CategoryResolver};
use crate::config::NormalizeConfig;
use crate::{date, store};

/// Orchestrates one receipt: date → store → per-item categories.
///
/// Never fails the record. Every per-field resolution failure degrades to a
/// safe default (null date, unchanged store, "General" category) so the
/// output is structurally valid even when the model output is garbage.
pub struct ReceiptNormalizer {
    config: NormalizeConfig,
    resolver: CategoryResolver,
}

impl ReceiptNormalizer {
    pub fn new(config: NormalizeConfig, catalog: Arc<ProductCatalog>) -> Self {
        let resolver =
            CategoryResolver::new(catalog, config.retailer.clone(), config.match_threshold)
                .with_synonyms(
                    config
                        .category_map
                        .iter()
                        .map(|s| (s.raw.clone(), s.canonical.clone()))
                        .collect(),
                );
        Self { config, resolver }
    }

    /// Attach the remote lookup capability. Without it the resolver goes
    /// straight to the local fuzzy fallback for retailer items.
    pub fn with_remote(mut self, remote: Box<dyn CategoryLookup>) -> Self {
        self.resolver = self.resolver.with_remote(remote);
        self
    }

    pub async fn normalize(&self, raw: &RawExtraction, recognized_text: &str) -> NormalizedReceipt {
        self.normalize_as_of(raw, recognized_text, chrono::Local::now().date_naive()).await
    }

    /// Like [`normalize`](Self::normalize) with an explicit "today" for the
    /// future-date rule.
    pub async fn normalize_as_of(
        &self,
        raw: &RawExtraction,
        recognized_text: &str,
        today: NaiveDate,
    ) -> NormalizedReceipt {
        let date = date::resolve_date(raw.date.as_deref(), recognized_text, today);
        if date.is_none() {
            tracing::warn!("No usable date in model output or OCR text");
        }

        let store = match raw.store.as_deref() {
            Some(raw_store) => self.normalize_store(raw_store),
            None => String::new(),
        };

        let mut items = Vec::with_capacity(raw.items.len());
        for item in &raw.items {
            let category = self.resolver.resolve_item(&item.name, &item.category, &store).await;
            items.push(ReceiptItem {
                category,
                name: item.name.clone(),
                price: item.price,
            });
        }

        NormalizedReceipt { date, store, items }
    }

    fn normalize_store(&self, raw_store: &str) -> String {
        // Config-supplied aliases take precedence over the built-in table.
        if !self.config.store_aliases.is_empty() {
            let extra: Vec<(&str, &str)> = self
                .config
                .store_aliases
                .iter()
                .map(|a| (a.contains.as_str(), a.canonical.as_str()))
                .collect();
            if let Some(canonical) = store::normalize_store_with(raw_store, &extra) {
                return canonical;
            }
        }
        store::normalize_store(raw_store)
    }
}
