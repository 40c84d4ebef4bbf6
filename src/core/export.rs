use crate::core::AggregateReport;
use crate::utils::error::{HarvestError, Result};
use std::io::Write;
use std::path::Path;

pub const SDR_KEYWORDS: [&str; 6] = [
    "sales development representative",
    "sdr",
    "bdr",
    "business development representative",
    "sales development rep",
    "business development rep",
];

pub fn is_sdr_title(title: &str) -> bool {
    let lower = title.to_lowercase();
    SDR_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyRow {
    pub name: String,
    pub job_count: u64,
    pub job_titles: Vec<String>,
}

/// Rows in ranked order. With `sdr_only`, only SDR titles are kept and the
/// count becomes the number of matching titles.
pub fn company_rows(report: &AggregateReport, sdr_only: bool) -> Vec<CompanyRow> {
    let mut rows: Vec<CompanyRow> = report
        .ranked()
        .into_iter()
        .filter_map(|company| {
            if !sdr_only {
                return Some(CompanyRow {
                    name: company.name.to_string(),
                    job_count: company.job_count,
                    job_titles: company.job_titles.iter().cloned().collect(),
                });
            }
            let titles: Vec<String> = company
                .job_titles
                .iter()
                .filter(|t| is_sdr_title(t))
                .cloned()
                .collect();
            (!titles.is_empty()).then(|| CompanyRow {
                name: company.name.to_string(),
                job_count: titles.len() as u64,
                job_titles: titles,
            })
        })
        .collect();

    if sdr_only {
        rows.sort_by(|a, b| b.job_count.cmp(&a.job_count).then(a.name.cmp(&b.name)));
    }
    rows
}

pub fn write_csv<W: Write>(rows: &[CompanyRow], sdr_only: bool, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if sdr_only {
        csv.write_record(["Company Name", "SDR Job Count", "SDR Job Titles"])?;
    } else {
        csv.write_record(["Company Name", "Job Count", "Job Titles"])?;
    }

    for row in rows {
        let count = row.job_count.to_string();
        let titles = row.job_titles.join(", ");
        csv.write_record([row.name.as_str(), count.as_str(), titles.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn read_report<P: AsRef<Path>>(path: P) -> Result<AggregateReport> {
    let content = std::fs::read(path.as_ref())?;
    let report: AggregateReport = serde_json::from_slice(&content)?;
    if report.companies.is_empty() {
        return Err(HarvestError::NoInputError {
            message: format!("No companies found in {}", path.as_ref().display()),
        });
    }
    Ok(report)
}
