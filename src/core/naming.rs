use chrono::{DateTime, Local};
use std::path::Path;

const REPLACED: [char; 14] = [
    '/', '?', '&', '=', ':', '#', '%', '+', ' ', '<', '>', '|', '"', '*',
];
const MAX_STEM_CHARS: usize = 200;

/// Filesystem-safe stem derived from a URL.
pub fn clean_filename(url: &str) -> String {
    let without_scheme = url.rsplit("//").next().unwrap_or(url);

    without_scheme
        .chars()
        .map(|c| if REPLACED.contains(&c) { '_' } else { c })
        .take(MAX_STEM_CHARS)
        .collect()
}

/// `<clean url>_<YYYYmmdd_HHMMSS>` for one scrape of `url`.
pub fn scrape_stem(url: &str, at: DateTime<Local>) -> String {
    format!("{}_{}", clean_filename(url), at.format("%Y%m%d_%H%M%S"))
}

/// `company_analysis.json` -> `company_analysis_aggregated.json`, keeping the directory.
pub fn aggregated_path(detail_path: &str) -> String {
    let path = Path::new(detail_path);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("company_analysis");
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let file_name = format!("{}_aggregated.{}", stem, extension);

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.join(file_name).to_string_lossy().into_owned()
        }
        _ => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_clean_filename_strips_scheme_and_specials() {
        assert_eq!(
            clean_filename("https://builtin.com/jobs?search=Sales+Development&country=USA"),
            "builtin.com_jobs_search_Sales_Development_country_USA"
        );
        assert_eq!(clean_filename("example.com/a b"), "example.com_a_b");
    }

    #[test]
    fn test_clean_filename_caps_length() {
        let url = format!("https://example.com/{}", "a".repeat(500));
        assert_eq!(clean_filename(&url).chars().count(), 200);
    }

    #[test]
    fn test_scrape_stem_appends_timestamp() {
        let at = Local.with_ymd_and_hms(2025, 5, 13, 14, 54, 47).unwrap();
        assert_eq!(
            scrape_stem("https://builtin.com/jobs", at),
            "builtin.com_jobs_20250513_145447"
        );
    }

    #[test]
    fn test_aggregated_path() {
        assert_eq!(
            aggregated_path("company_analysis.json"),
            "company_analysis_aggregated.json"
        );
        let nested = aggregated_path("out/run.json");
        assert!(nested.ends_with("run_aggregated.json"));
        assert!(nested.starts_with("out"));
    }
}
