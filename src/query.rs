//! SPARQL query construction.

/// Wikidata class for paintings.
pub const PAINTING_CLASS: &str = "wd:Q3305213";

/// Languages handed to the label service, in preference order.
pub const LABEL_LANGUAGES: &str = "en,ja";

/// Paintings that have an image, optionally with a creator, ordered by
/// sitelink count and capped at `limit` rows.
pub fn build_sparql(limit: u32) -> String {
    format!(
        r#"
SELECT ?item ?itemLabel ?creatorLabel ?image ?sitelinks WHERE {{
  ?item wdt:P31 {PAINTING_CLASS};
        wdt:P18 ?image.
  OPTIONAL {{ ?item wdt:P170 ?creator. }}
  ?item wikibase:sitelinks ?sitelinks.
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{LABEL_LANGUAGES}". }}
}}
ORDER BY DESC(?sitelinks)
LIMIT {limit}
"#
    )
}
