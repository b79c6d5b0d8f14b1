use serde::{Deserialize, Serialize};

/// Deployment-wide fuzzy-match threshold, used by the local fallback, the
/// HTTP client default, and the lookup service default alike. The deployment
/// runs a single threshold so local and remote scoring stay comparable.
pub const DEFAULT_THRESHOLD: u8 = 95;

pub const DEFAULT_RETAILER: &str = "IKEA";

/// Tuning knobs for the normalization pipeline, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Store whose items go through the catalog-backed category strategies.
    pub retailer: String,
    /// Minimum fuzzy score (0–100) for a match to count.
    pub match_threshold: u8,
    /// Extra store aliases, checked before the built-in table.
    pub store_aliases: Vec<StoreAlias>,
    /// Extra raw-category synonyms, checked before the built-in map.
    pub category_map: Vec<CategorySynonym>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreAlias {
    pub contains: String,
    pub canonical: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySynonym {
    pub raw: String,
    pub canonical: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            retailer: DEFAULT_RETAILER.to_string(),
            match_threshold: DEFAULT_THRESHOLD,
            store_aliases: Vec::new(),
            category_map: Vec::new(),
        }
    }
}

impl NormalizeConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_content)
    }
}
