//! Binding -> record mapping and de-duplication.

use std::collections::HashSet;

use url::Url;

use crate::model::{Artwork, Binding};

pub const THUMB_WIDTH: u32 = 360;
pub const UNKNOWN_ARTIST: &str = "Unknown";

/// Force the `width` query parameter of `url` to `width`.
///
/// The first existing `width` pair keeps its position and later duplicates are
/// dropped; otherwise the pair is appended. Strings that do not parse as an
/// absolute URL come back untouched.
pub fn to_thumb(url: &str, width: u32) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };

    let width = width.to_string();
    let mut replaced = false;
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in parsed.query_pairs() {
        if key == "width" {
            if !replaced {
                pairs.push((key.into_owned(), width.clone()));
                replaced = true;
            }
        } else {
            pairs.push((key.into_owned(), value.into_owned()));
        }
    }
    if !replaced {
        pairs.push(("width".to_string(), width));
    }

    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.into()
}

/// Last `/`-separated segment of an entity URL, e.g. `Q12418`.
pub fn item_id(entity_url: &str) -> &str {
    entity_url.rsplit('/').next().unwrap_or(entity_url)
}

pub fn to_artwork(binding: &Binding, width: u32) -> Artwork {
    let id = item_id(&binding.item.value).to_string();
    let title = binding
        .item_label
        .as_ref()
        .map(|t| t.value.clone())
        .unwrap_or_else(|| id.clone());
    let artist = binding
        .creator_label
        .as_ref()
        .map(|t| t.value.clone())
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
    Artwork {
        image: to_thumb(&binding.image.value, width),
        id,
        title,
        artist,
    }
}

pub fn transform(bindings: &[Binding], width: u32) -> Vec<Artwork> {
    bindings.iter().map(|b| to_artwork(b, width)).collect()
}

/// Keep the first record seen for each id, in original order.
pub fn dedup_by_id(records: Vec<Artwork>) -> Vec<Artwork> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect()
}
