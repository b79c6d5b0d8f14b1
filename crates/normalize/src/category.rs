use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::ProductCatalog;
use crate::fuzzy;

/// Fallback label when every resolution strategy comes up empty.
pub const DEFAULT_CATEGORY: &str = "General";

/// Raw-category synonyms → canonical labels, checked before the
/// singularization heuristic. Keys are lowercased and trimmed on lookup.
pub const CATEGORY_MAP: &[(&str, &str)] = &[
    ("fruits", "Fruit"),
    ("vegetables", "Vegetable"),
    ("furniture", "Furniture"),
    ("beverages", "Beverage"),
    ("drinks", "Beverage"),
    ("dairy", "Dairy"),
    ("dairy products", "Dairy"),
    ("meat", "Meat"),
    ("bakery", "Bakery"),
    ("baked goods", "Bakery"),
    ("snacks", "Snack"),
    ("sweets", "Sweet"),
    ("frozen", "Frozen"),
    ("household", "Household"),
    ("hygiene", "Hygiene"),
    ("kitchen", "Kitchen"),
    ("textiles", "Textile"),
];

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup transport error: {0}")]
    Transport(String),
    #[error("lookup service returned status {0}")]
    Status(u16),
}

/// A remote match that cleared the service-side threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMatch {
    pub matched_name: String,
    pub category: String,
    pub score: u8,
}

/// Capability interface over the remote fuzzy-category lookup service.
///
/// Kept behind a trait so the resolver is testable with an in-memory fake;
/// the HTTP transport lives in `beleg-lookup`.
#[async_trait]
pub trait CategoryLookup: Send + Sync {
    async fn lookup(&self, item_name: &str, threshold: u8) -> Result<Option<RemoteMatch>, LookupError>;
}

#[async_trait]
impl<L: CategoryLookup + ?Sized> CategoryLookup for Arc<L> {
    async fn lookup(&self, item_name: &str, threshold: u8) -> Result<Option<RemoteMatch>, LookupError> {
        (**self).lookup(item_name, threshold).await
    }
}

/// Per-item category decision: an ordered fallback chain that short-circuits
/// on the first strategy producing a value.
///
/// 1. Retailer-gated remote lookup over the decomposed item name.
/// 2. Retailer-gated local fuzzy match against the product catalog.
/// 3. Static synonym map over the raw category.
/// 4. Singularization heuristic over the raw category.
/// 5. Literal `"General"`.
pub struct CategoryResolver {
    catalog: Arc<ProductCatalog>,
    remote: Option<Box<dyn CategoryLookup>>,
    retailer: String,
    threshold: u8,
    /// Extra raw-category synonyms, checked before [`CATEGORY_MAP`].
    extra_synonyms: Vec<(String, String)>,
}

impl CategoryResolver {
    pub fn new(catalog: Arc<ProductCatalog>, retailer: impl Into<String>, threshold: u8) -> Self {
        Self {
            catalog,
            remote: None,
            retailer: retailer.into(),
            threshold,
            extra_synonyms: Vec::new(),
        }
    }

    pub fn with_remote(mut self, remote: Box<dyn CategoryLookup>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Additional `raw → canonical` synonym pairs. Keys are compared
    /// lowercased and trimmed, like the built-in map.
    pub fn with_synonyms(mut self, synonyms: Vec<(String, String)>) -> Self {
        self.extra_synonyms = synonyms;
        self
    }

    /// Resolves a non-empty category for one line item. `store` must already
    /// be canonical; the retailer-specific strategies only run when it equals
    /// the configured retailer.
    pub async fn resolve_item(&self, item_name: &str, raw_category: &str, store: &str) -> String {
        if store == self.retailer {
            if let Some(category) = self.remote_lookup(item_name).await {
                return category;
            }
            if let Some(category) = self.local_fuzzy(item_name) {
                return category;
            }
        }
        self.from_raw_category(raw_category)
    }

    /// Step 1: query the remote service once per decomposed name candidate
    /// and keep the highest-scoring hit. A failed call counts as "no match"
    /// for that candidate only; the remaining candidates still run.
    async fn remote_lookup(&self, item_name: &str) -> Option<String> {
        let remote = self.remote.as_ref()?;
        let mut best: Option<RemoteMatch> = None;

        for candidate in decompose(item_name) {
            match remote.lookup(candidate, self.threshold).await {
                Ok(Some(m)) if m.score >= self.threshold => {
                    if best.as_ref().is_none_or(|b| m.score > b.score) {
                        best = Some(m);
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!("Remote category lookup failed for '{candidate}': {err}");
                }
            }
        }
        best.map(|m| m.category)
    }

    /// Step 2: whole-string fuzzy match against the local catalog.
    fn local_fuzzy(&self, item_name: &str) -> Option<String> {
        let m = fuzzy::best_match(item_name, self.catalog.names())?;
        if m.score >= self.threshold {
            return self.catalog.category(&m.name).map(str::to_string);
        }
        None
    }

    /// Steps 3–5: synonym map, then singularization, then the default label.
    fn from_raw_category(&self, raw_category: &str) -> String {
        let key = raw_category.trim().to_lowercase();
        if let Some((_, mapped)) =
            self.extra_synonyms.iter().find(|(k, _)| k.to_lowercase() == key)
        {
            return mapped.to_string();
        }
        if let Some((_, mapped)) = CATEGORY_MAP.iter().find(|(k, _)| *k == key) {
            return mapped.to_string();
        }
        let singular = singularize(raw_category.trim());
        if singular.is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            singular
        }
    }
}

/// Candidate set for the remote fan-out: the full name plus each
/// whitespace/hyphen-separated token, deduplicated, order preserved.
fn decompose(item_name: &str) -> Vec<&str> {
    let mut candidates = Vec::new();
    let full = item_name.trim();
    if !full.is_empty() {
        candidates.push(full);
    }
    for token in item_name.split(|c: char| c.is_whitespace() || c == '-') {
        let token = token.trim();
        if !token.is_empty() && !candidates.contains(&token) {
            candidates.push(token);
        }
    }
    candidates
}

/// Minimal pluralization-stripping: "ies" → "y", trailing "s" (but not "ss")
/// dropped, anything else unchanged.
fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    if word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn catalog() -> Arc<ProductCatalog> {
        let csv = "\
name,category
billy bookcase,Furniture
poäng armchair,Furniture
smycka artificial flower,Decoration
";
        Arc::new(ProductCatalog::from_csv_reader(csv.as_bytes()).unwrap())
    }

    /// In-memory fake for the remote capability. Records queried candidates
    /// and serves canned responses per candidate.
    struct FakeLookup {
        responses: HashMap<String, Result<Option<RemoteMatch>, ()>>,
        queried: Mutex<Vec<String>>,
    }

    impl FakeLookup {
        fn new() -> Self {
            Self { responses: HashMap::new(), queried: Mutex::new(Vec::new()) }
        }

        fn with_hit(mut self, candidate: &str, category: &str, score: u8) -> Self {
            self.responses.insert(
                candidate.to_string(),
                Ok(Some(RemoteMatch {
                    matched_name: candidate.to_lowercase(),
                    category: category.to_string(),
                    score,
                })),
            );
            self
        }

        fn with_failure(mut self, candidate: &str) -> Self {
            self.responses.insert(candidate.to_string(), Err(()));
            self
        }
    }

    #[async_trait]
    impl CategoryLookup for FakeLookup {
        async fn lookup(
            &self,
            item_name: &str,
            _threshold: u8,
        ) -> Result<Option<RemoteMatch>, LookupError> {
            self.queried.lock().unwrap().push(item_name.to_string());
            match self.responses.get(item_name) {
                Some(Ok(m)) => Ok(m.clone()),
                Some(Err(())) => Err(LookupError::Transport("connection refused".into())),
                None => Ok(None),
            }
        }
    }

    fn resolver() -> CategoryResolver {
        CategoryResolver::new(catalog(), "IKEA", 95)
    }

    #[test]
    fn decompose_full_name_then_tokens() {
        assert_eq!(decompose("BILLY bookcase"), vec!["BILLY bookcase", "BILLY", "bookcase"]);
        assert_eq!(decompose("HEMNES-daybed"), vec!["HEMNES-daybed", "HEMNES", "daybed"]);
    }

    #[test]
    fn decompose_dedupes_single_word() {
        assert_eq!(decompose("BILLY"), vec!["BILLY"]);
        assert!(decompose("   ").is_empty());
    }

    #[test]
    fn singularize_rules() {
        assert_eq!(singularize("Bottles"), "Bottle");
        assert_eq!(singularize("Berries"), "Berry");
        assert_eq!(singularize("Glass"), "Glass");
        assert_eq!(singularize("Bread"), "Bread");
    }

    #[tokio::test]
    async fn remote_hit_wins_for_retailer_items() {
        let remote = FakeLookup::new().with_hit("BILLY", "Bookcases", 97);
        let r = resolver().with_remote(Box::new(remote));
        let category = r.resolve_item("BILLY bookcase", "Furniture", "IKEA").await;
        assert_eq!(category, "Bookcases");
    }

    #[tokio::test]
    async fn remote_keeps_highest_scoring_candidate() {
        let remote = FakeLookup::new()
            .with_hit("BILLY bookcase", "Storage", 95)
            .with_hit("BILLY", "Bookcases", 99);
        let r = resolver().with_remote(Box::new(remote));
        let category = r.resolve_item("BILLY bookcase", "", "IKEA").await;
        assert_eq!(category, "Bookcases");
    }

    #[tokio::test]
    async fn remote_takes_precedence_over_exact_local_match() {
        // The catalog matches "billy bookcase" at score 100, but a remote hit
        // clearing the threshold wins regardless of the local score.
        let remote = FakeLookup::new().with_hit("billy bookcase", "Bookcases", 95);
        let r = resolver().with_remote(Box::new(remote));
        let category = r.resolve_item("billy bookcase", "Furniture", "IKEA").await;
        assert_eq!(category, "Bookcases");
    }

    #[tokio::test]
    async fn remote_below_threshold_is_ignored() {
        let remote = FakeLookup::new().with_hit("BILLY", "Bookcases", 80);
        let r = resolver().with_remote(Box::new(remote));
        let category = r.resolve_item("BILLY", "Furniture", "IKEA").await;
        // Local catalog is also too far from "BILLY" alone; the synonym map wins.
        assert_eq!(category, "Furniture");
    }

    #[tokio::test]
    async fn remote_failure_does_not_abort_sibling_candidates() {
        let remote = FakeLookup::new()
            .with_failure("BILLY bookcase")
            .with_hit("bookcase", "Bookcases", 96);
        let r = resolver().with_remote(Box::new(remote));
        let category = r.resolve_item("BILLY bookcase", "", "IKEA").await;
        assert_eq!(category, "Bookcases");
    }

    #[tokio::test]
    async fn remote_queries_full_name_and_every_token() {
        let remote = Arc::new(FakeLookup::new());
        let r = resolver().with_remote(Box::new(Arc::clone(&remote)));
        let _ = r.resolve_item("BILLY bookcase", "Furniture", "IKEA").await;
        let queried = remote.queried.lock().unwrap();
        assert_eq!(*queried, vec!["BILLY bookcase", "BILLY", "bookcase"]);
    }

    #[tokio::test]
    async fn local_fuzzy_fallback_when_remote_absent() {
        let r = resolver();
        // One edit over 25 characters scores 96, clearing the 95 threshold.
        let category = r.resolve_item("SMYCKA artificial flowers", "", "IKEA").await;
        assert_eq!(category, "Decoration");
    }

    #[tokio::test]
    async fn retailer_strategies_skipped_for_other_stores() {
        let remote = FakeLookup::new().with_hit("Apfel", "Obst", 100);
        let r = resolver().with_remote(Box::new(remote));
        let category = r.resolve_item("Apfel", "fruits", "REWE").await;
        assert_eq!(category, "Fruit");
    }

    #[tokio::test]
    async fn extra_synonyms_checked_before_builtin_map() {
        let r = resolver().with_synonyms(vec![
            ("obst".to_string(), "Obst und Gemüse".to_string()),
            ("fruits".to_string(), "Fresh Fruit".to_string()),
        ]);
        assert_eq!(r.resolve_item("Apfel", "Obst", "REWE").await, "Obst und Gemüse");
        // Overrides shadow the built-in "fruits" → "Fruit" entry.
        assert_eq!(r.resolve_item("Banane", "fruits", "REWE").await, "Fresh Fruit");
    }

    #[tokio::test]
    async fn synonym_map_applies_case_insensitively() {
        let r = resolver();
        assert_eq!(r.resolve_item("Banane", " Fruits ", "REWE").await, "Fruit");
        assert_eq!(r.resolve_item("Möhren", "VEGETABLES", "REWE").await, "Vegetable");
    }

    #[tokio::test]
    async fn unmapped_category_is_singularized() {
        let r = resolver();
        assert_eq!(r.resolve_item("Wasser", "Bottles", "REWE").await, "Bottle");
        assert_eq!(r.resolve_item("Beeren", "Berries", "REWE").await, "Berry");
    }

    #[tokio::test]
    async fn empty_everything_defaults_to_general() {
        let r = resolver();
        assert_eq!(r.resolve_item("", "", "REWE").await, "General");
        assert_eq!(r.resolve_item("Unbekannt", "", "IKEA").await, "General");
    }
}
