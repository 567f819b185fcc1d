use crate::crawler::RecordLayout;
use crate::output::traits::{OutputResult, Renderer};
use crate::record::Record;

/// Renders records as a pretty-printed JSON array of objects
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, records: &[Record], _layout: RecordLayout) -> OutputResult<String> {
        Ok(serde_json::to_string_pretty(records)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_empty_array() {
        let out = JsonRenderer.render(&[], RecordLayout::Fragments).unwrap();
        assert_eq!(out, "[]");
    }

    #[test]
    fn test_round_trip_preserves_order_and_values() {
        let records: Vec<Record> = vec![
            [("text", "A \"quoted\""), ("href", "/a"), ("alt", "")]
                .into_iter()
                .collect(),
            [("text", "B"), ("href", "/b"), ("alt", "line\nbreak")]
                .into_iter()
                .collect(),
        ];

        let out = JsonRenderer
            .render(&records, RecordLayout::Fragments)
            .unwrap();
        let parsed: Vec<Record> = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed, records);
        assert_eq!(
            parsed[0].keys().collect::<Vec<_>>(),
            vec!["text", "href", "alt"]
        );
    }

    #[test]
    fn test_whole_page_objects() {
        let records = vec![Record::whole_page("https://example.com/", "<p>x</p>")];
        let out = JsonRenderer
            .render(&records, RecordLayout::WholePage)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["url"], "https://example.com/");
        assert_eq!(value[0]["html"], "<p>x</p>");
    }
}
