use serde::{Deserialize, Serialize};

/// A single RDF term as returned in SPARQL JSON results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Term {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub value: String,
}

impl Term {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// One row of `results.bindings`. Variables the query does not select are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Binding {
    pub item: Term,
    #[serde(rename = "itemLabel", default)]
    pub item_label: Option<Term>,
    #[serde(rename = "creatorLabel", default)]
    pub creator_label: Option<Term>,
    pub image: Term,
    // Only used for ordering on the server side.
    #[serde(default)]
    pub sitelinks: Option<Term>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Head {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultRows {
    pub bindings: Vec<Binding>,
}

/// Top-level `application/sparql-results+json` document.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub head: Head,
    pub results: ResultRows,
}

/// Flat record written to the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bindings_with_optional_labels() {
        let raw = r#"{
            "head": {"vars": ["item", "itemLabel", "creatorLabel", "image", "sitelinks"]},
            "results": {"bindings": [
                {
                    "item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q12418"},
                    "itemLabel": {"xml:lang": "en", "type": "literal", "value": "Mona Lisa"},
                    "creatorLabel": {"xml:lang": "en", "type": "literal", "value": "Leonardo da Vinci"},
                    "image": {"type": "uri", "value": "http://commons.wikimedia.org/wiki/Special:FilePath/Mona%20Lisa.jpg"},
                    "sitelinks": {"datatype": "http://www.w3.org/2001/XMLSchema#integer", "type": "literal", "value": "150"}
                },
                {
                    "item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q1"},
                    "image": {"type": "uri", "value": "x"}
                }
            ]}
        }"#;
        let parsed: SparqlResults = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.head.vars.len(), 5);
        assert_eq!(parsed.results.bindings.len(), 2);

        let first = &parsed.results.bindings[0];
        assert_eq!(first.item_label.as_ref().unwrap().value, "Mona Lisa");
        assert_eq!(first.sitelinks.as_ref().unwrap().value, "150");

        let second = &parsed.results.bindings[1];
        assert!(second.item_label.is_none());
        assert!(second.creator_label.is_none());
    }

    #[test]
    fn missing_bindings_is_an_error() {
        let err = serde_json::from_str::<SparqlResults>(r#"{"head": {}, "results": {}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn artwork_serializes_in_field_order() {
        let art = Artwork {
            id: "Q1".into(),
            title: "T".into(),
            artist: "A".into(),
            image: "I".into(),
        };
        let json = serde_json::to_string(&art).unwrap();
        assert_eq!(json, r#"{"id":"Q1","title":"T","artist":"A","image":"I"}"#);
    }
}
