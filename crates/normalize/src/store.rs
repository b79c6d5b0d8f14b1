/// Known store substrings → canonical names, most specific first.
///
/// Entry order matters: the first key that is a substring of the cleaned
/// input wins, so short ambiguous keys ("dm") sit at the bottom.
pub const STORE_ALIASES: &[(&str, &str)] = &[
    ("ikea", "IKEA"),
    ("kaufland", "Kaufland"),
    ("rossmann", "Rossmann"),
    ("edeka", "EDEKA"),
    ("rewe", "REWE"),
    ("aldi", "ALDI"),
    ("lidl", "Lidl"),
    ("netto", "Netto"),
    ("penny", "PENNY"),
    ("dm-drogerie", "dm"),
    ("dm drogerie", "dm"),
    ("drogerie markt", "dm"),
];

/// Canonicalizes a free-text store name against an ordered substring table.
/// No table entry matches → the original raw string comes back unchanged
/// (not the lowercased form).
pub fn normalize_store(raw: &str) -> String {
    normalize_store_with(raw, STORE_ALIASES).unwrap_or_else(|| raw.to_string())
}

/// `Some(canonical)` iff a table entry matched, so callers layering several
/// tables can tell a miss apart from an input that was already canonical.
pub fn normalize_store_with(
    raw: &str,
    aliases: &[(impl AsRef<str>, impl AsRef<str>)],
) -> Option<String> {
    let cleaned = clean(raw);
    aliases
        .iter()
        .find(|(key, _)| cleaned.contains(key.as_ref()))
        .map(|(_, canonical)| canonical.as_ref().to_string())
}

/// Lowercase, strip commas, collapse doubled spaces, trim.
fn clean(raw: &str) -> String {
    let mut s = raw.to_lowercase().replace(',', "");
    while s.contains("  ") {
        s = s.replace("  ", " ");
    }
    s.trim().to_string()
}
