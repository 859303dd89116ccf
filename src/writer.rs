use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::Artwork;

/// Pretty JSON (two-space indent) plus a trailing newline.
pub fn render(records: &[Artwork]) -> Result<String> {
    let mut out = serde_json::to_string_pretty(records).context("serialize records")?;
    out.push('\n');
    Ok(out)
}

/// Overwrites `path`. Nothing touches the filesystem until rendering succeeded.
pub fn write_artworks(path: &Path, records: &[Artwork]) -> Result<()> {
    let contents = render(records)?;
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_space_indent_and_trailing_newline() {
        let records = vec![Artwork {
            id: "Q1".into(),
            title: "Title".into(),
            artist: "Unknown".into(),
            image: "https://example.org/a.jpg?width=360".into(),
        }];
        let text = render(&records).unwrap();
        assert_eq!(
            text,
            "[\n  {\n    \"id\": \"Q1\",\n    \"title\": \"Title\",\n    \"artist\": \"Unknown\",\n    \"image\": \"https://example.org/a.jpg?width=360\"\n  }\n]\n"
        );
    }

    #[test]
    fn empty_list_is_still_an_array() {
        assert_eq!(render(&[]).unwrap(), "[]\n");
    }

    #[test]
    fn overwrites_existing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("data.json");
        fs::write(&path, "stale contents that are much longer than the new ones").unwrap();
        write_artworks(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn keeps_non_ascii_as_utf8() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("data.json");
        let records = vec![Artwork {
            id: "Q1".into(),
            title: "神奈川沖浪裏".into(),
            artist: "葛飾北斎".into(),
            image: String::new(),
        }];
        write_artworks(&path, &records).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"title\": \"神奈川沖浪裏\""));
    }
}
