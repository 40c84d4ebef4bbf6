use crate::core::{AggregateReport, ExtractionRecord, UntitledListings};
use crate::domain::model::RankedCompany;

impl AggregateReport {
    /// Fold one record into the report and hand the report back.
    pub fn fold(mut self, record: &ExtractionRecord, untitled: UntitledListings) -> Self {
        let Some(name) = record.attributed_company() else {
            self.unattributed_records += 1;
            return self;
        };

        let listings = match (record.job_titles.len(), untitled) {
            (0, UntitledListings::One) => 1,
            (0, UntitledListings::Zero) => 0,
            (n, _) => n as u64,
        };

        let entry = self.companies.entry(name.to_string()).or_default();
        entry.job_count += listings;
        entry
            .job_titles
            .extend(record.job_titles.iter().cloned());

        self.total_job_listings += listings;
        self.total_companies = self.companies.len() as u64;
        self
    }

    /// Companies by job count, highest first; ties broken by name.
    pub fn ranked(&self) -> Vec<RankedCompany<'_>> {
        let mut ranked: Vec<RankedCompany<'_>> = self
            .companies
            .iter()
            .map(|(name, entry)| RankedCompany {
                name,
                job_count: entry.job_count,
                job_titles: &entry.job_titles,
            })
            .collect();
        ranked.sort_by(|a, b| b.job_count.cmp(&a.job_count).then(a.name.cmp(b.name)));
        ranked
    }
}

pub fn aggregate<'a, I>(records: I, untitled: UntitledListings) -> AggregateReport
where
    I: IntoIterator<Item = &'a ExtractionRecord>,
{
    records
        .into_iter()
        .fold(AggregateReport::default(), |report, record| {
            report.fold(record, untitled)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(company: Option<&str>, titles: &[&str]) -> ExtractionRecord {
        ExtractionRecord::new(
            "page.md",
            company.map(str::to_string),
            titles.iter().map(|t| t.to_string()).collect(),
            "",
        )
    }

    fn assert_invariants(report: &AggregateReport) {
        let sum: u64 = report.companies.values().map(|c| c.job_count).sum();
        assert_eq!(sum, report.total_job_listings);
        assert_eq!(report.companies.len() as u64, report.total_companies);
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<ExtractionRecord> = Vec::new();
        let report = aggregate(&records, UntitledListings::One);
        assert_eq!(report.total_companies, 0);
        assert_eq!(report.total_job_listings, 0);
        assert!(report.companies.is_empty());
        assert_eq!(report.unattributed_records, 0);
    }

    #[test]
    fn test_acme_globex_example() {
        let records = vec![
            record(Some("Acme"), &["SDR"]),
            record(Some("Acme"), &["AE"]),
            record(Some("Globex"), &["SDR"]),
        ];
        let report = aggregate(&records, UntitledListings::One);

        assert_eq!(report.total_companies, 2);
        assert_eq!(report.total_job_listings, 3);

        let acme = &report.companies["Acme"];
        assert_eq!(acme.job_count, 2);
        assert_eq!(
            acme.job_titles.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["AE", "SDR"]
        );
        assert_eq!(report.companies["Globex"].job_count, 1);
        assert_invariants(&report);
    }

    #[test]
    fn test_titles_dedup_is_exact_and_case_sensitive() {
        let records = vec![
            record(Some("Initech"), &["SDR", "sdr"]),
            record(Some("Initech"), &["SDR"]),
        ];
        let report = aggregate(&records, UntitledListings::One);
        let initech = &report.companies["Initech"];
        assert_eq!(initech.job_count, 3);
        assert_eq!(initech.job_titles.len(), 2);
    }

    #[test]
    fn test_unattributed_records_contribute_nothing() {
        let records = vec![
            record(None, &["SDR"]),
            record(Some("   "), &["BDR"]),
            record(Some("Acme"), &["SDR"]),
        ];
        let report = aggregate(&records, UntitledListings::One);
        assert_eq!(report.total_companies, 1);
        assert_eq!(report.total_job_listings, 1);
        assert_eq!(report.unattributed_records, 2);
        assert_invariants(&report);
    }

    #[test]
    fn test_untitled_policy() {
        let records = vec![record(Some("Hooli"), &[]), record(Some("Hooli"), &["AE"])];

        let counted = aggregate(&records, UntitledListings::One);
        assert_eq!(counted.companies["Hooli"].job_count, 2);

        let ignored = aggregate(&records, UntitledListings::Zero);
        assert_eq!(ignored.companies["Hooli"].job_count, 1);
        // the company is still known even when it adds no listings
        assert_eq!(ignored.total_companies, 1);
        assert_invariants(&counted);
        assert_invariants(&ignored);
    }

    #[test]
    fn test_company_names_are_trimmed() {
        let records = vec![record(Some("Acme "), &["SDR"]), record(Some("Acme"), &["AE"])];
        let report = aggregate(&records, UntitledListings::One);
        assert_eq!(report.total_companies, 1);
    }

    #[test]
    fn test_ranked_orders_by_count_then_name() {
        let records = vec![
            record(Some("Zeta"), &["SDR"]),
            record(Some("Alpha"), &["SDR"]),
            record(Some("Mid"), &["SDR", "AE", "BDR"]),
        ];
        let report = aggregate(&records, UntitledListings::One);
        let names: Vec<&str> = report.ranked().iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Mid", "Alpha", "Zeta"]);
    }

    #[test]
    fn test_report_serializes_as_mapping() {
        let report = aggregate(&[record(Some("Acme"), &["SDR"])], UntitledListings::One);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["companies"]["Acme"]["job_count"], 1);
        assert_eq!(json["companies"]["Acme"]["job_titles"][0], "SDR");
        assert_eq!(json["total_companies"], 1);
        assert_eq!(json["total_job_listings"], 1);
    }
}
