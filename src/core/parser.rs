//! Best-effort interpretation of free-text model replies.
//!
//! The model is asked for a JSON object, but replies routinely wrap it in a
//! markdown fence or surround it with prose. Anything that cannot be read as
//! one of the two known shapes comes back as [`Extraction::Unparsed`].

use crate::core::{Extraction, ExtractionRecord};
use serde_json::{Map, Value};

const NAME_KEYS: [&str; 3] = ["company_name", "company", "name"];
const TITLE_KEYS: [&str; 2] = ["job_titles", "titles"];

/// Slice out the JSON object embedded in a reply, if there is one.
pub fn locate_json(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();

    if let Some(start) = trimmed.find("```json") {
        let body = &trimmed[start + 7..];
        if let Some(end) = body.find("```") {
            let block = body[..end].trim();
            if block.starts_with('{') {
                return Some(block);
            }
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (end > start).then(|| &trimmed[start..=end])
}

pub fn parse_model_output(source_file: &str, raw: &str) -> Extraction {
    let Some(block) = locate_json(raw) else {
        tracing::debug!("No JSON object in reply for {}", source_file);
        return Extraction::Unparsed(raw.to_string());
    };

    let object = match serde_json::from_str::<Value>(block) {
        Ok(Value::Object(object)) => object,
        Ok(_) => return Extraction::Unparsed(raw.to_string()),
        Err(e) => {
            tracing::debug!("Reply for {} is not valid JSON: {}", source_file, e);
            return Extraction::Unparsed(raw.to_string());
        }
    };

    if let Some(Value::Array(companies)) = object.get("companies") {
        let records = companies
            .iter()
            .filter_map(Value::as_object)
            .map(|entry| {
                ExtractionRecord::new(
                    source_file,
                    company_name(entry),
                    job_titles(entry),
                    Value::Object(entry.clone()).to_string(),
                )
            })
            .collect();
        return Extraction::Parsed(records);
    }

    let has_company_shape = NAME_KEYS
        .iter()
        .chain(TITLE_KEYS.iter())
        .any(|key| object.contains_key(*key));
    if !has_company_shape {
        return Extraction::Unparsed(raw.to_string());
    }

    Extraction::Parsed(vec![ExtractionRecord::new(
        source_file,
        company_name(&object),
        job_titles(&object),
        raw,
    )])
}

fn company_name(entry: &Map<String, Value>) -> Option<String> {
    NAME_KEYS
        .iter()
        .find_map(|key| entry.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn job_titles(entry: &Map<String, Value>) -> Vec<String> {
    let Some(value) = TITLE_KEYS.iter().find_map(|key| entry.get(*key)) else {
        return Vec::new();
    };

    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(str::to_string)
            .collect(),
        Value::String(title) if !title.trim().is_empty() => vec![title.trim().to_string()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_company_shape() {
        let raw = r#"{"company_name": "Acme", "job_titles": ["SDR", "AE"]}"#;
        match parse_model_output("acme.md", raw) {
            Extraction::Parsed(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].company_name.as_deref(), Some("Acme"));
                assert_eq!(records[0].job_titles, vec!["SDR", "AE"]);
                assert_eq!(records[0].source_file, "acme.md");
                assert_eq!(records[0].raw_model_output, raw);
            }
            other => panic!("expected parsed, got {:?}", other),
        }
    }

    #[test]
    fn test_listing_shape_inside_code_fence() {
        let raw = "Here is the analysis:\n```json\n{\n  \"companies\": [\n    {\"name\": \"Acme\", \"job_count\": 2, \"job_titles\": [\"SDR\", \"BDR\"]},\n    {\"name\": \"Globex\", \"job_titles\": [\"Sales Development Representative\"]}\n  ],\n  \"total_companies\": 2\n}\n```\nLet me know if you need more.";
        let records = match parse_model_output("jobs.md", raw) {
            Extraction::Parsed(records) => records,
            other => panic!("expected parsed, got {:?}", other),
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].company_name.as_deref(), Some("Acme"));
        assert_eq!(records[0].job_titles, vec!["SDR", "BDR"]);
        assert_eq!(records[1].company_name.as_deref(), Some("Globex"));
        assert!(records[1].raw_model_output.contains("Globex"));
        assert!(!records[1].raw_model_output.contains("Acme"));
    }

    #[test]
    fn test_braces_in_surrounding_prose() {
        let raw = "Sure! {\"companies\": [{\"company_name\": \"Initech\", \"titles\": \"BDR\"}]} Done.";
        let records = parse_model_output("x.md", raw).into_records("x.md");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].job_titles, vec!["BDR"]);
    }

    #[test]
    fn test_empty_company_list_is_parsed() {
        let extraction = parse_model_output("x.md", r#"{"companies": []}"#);
        assert_eq!(extraction, Extraction::Parsed(vec![]));
    }

    #[test]
    fn test_no_json_is_unparsed() {
        let raw = "I could not find any companies in this page.";
        assert_eq!(
            parse_model_output("x.md", raw),
            Extraction::Unparsed(raw.to_string())
        );
    }

    #[test]
    fn test_truncated_json_is_unparsed() {
        let raw = r#"{"companies": [{"name": "Acme", "job_titles": ["SDR"]"#;
        assert!(!parse_model_output("x.md", raw).is_parsed());
    }

    #[test]
    fn test_unrelated_object_is_unparsed() {
        let raw = r#"{"error": "content too short"}"#;
        assert!(!parse_model_output("x.md", raw).is_parsed());
    }

    #[test]
    fn test_unparsed_becomes_unattributed_record() {
        let records = Extraction::Unparsed("garbage".to_string()).into_records("bad.md");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].company_name, None);
        assert!(records[0].job_titles.is_empty());
        assert_eq!(records[0].raw_model_output, "garbage");
        assert_eq!(records[0].source_file, "bad.md");
    }

    #[test]
    fn test_blank_name_and_titles_are_dropped() {
        let raw = r#"{"company_name": "  ", "job_titles": ["", " AE ", 7]}"#;
        let records = parse_model_output("x.md", raw).into_records("x.md");
        assert_eq!(records[0].company_name, None);
        assert_eq!(records[0].job_titles, vec!["AE"]);
    }
}
