//! Benchmark summary formatting.

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use std::fmt;
use std::str::FromStr;

use crate::metrics::BenchSummary;
use crate::render::to_indented_json;

/// How the end-of-run summary is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
    None,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(ReportFormat::Table),
            "json" => Ok(ReportFormat::Json),
            "none" => Ok(ReportFormat::None),
            other => Err(format!(
                "unknown report format '{}' (expected table, json or none)",
                other
            )),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportFormat::Table => "table",
            ReportFormat::Json => "json",
            ReportFormat::None => "none",
        })
    }
}

/// Formats benchmark summaries for output.
pub struct ResultsReport;

impl ResultsReport {
    /// Format in the requested style; `None` for [`ReportFormat::None`].
    pub fn format(summary: &BenchSummary, format: ReportFormat) -> serde_json::Result<Option<String>> {
        match format {
            ReportFormat::Table => Ok(Some(Self::format_table(summary))),
            ReportFormat::Json => Self::format_json(summary).map(Some),
            ReportFormat::None => Ok(None),
        }
    }

    /// Format the summary as a console table.
    pub fn format_table(summary: &BenchSummary) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                format!("Benchmark: {}", summary.query),
                summary.target.clone(),
            ]);

        table.add_row(vec!["Duration:", &format!("{:.1}s", summary.duration_secs)]);
        table.add_row(vec!["Concurrency:", &summary.concurrency.to_string()]);
        table.add_row(vec!["Seed:", &summary.seed.to_string()]);

        table.add_row(vec!["", ""]);
        table.add_row(vec![
            "Total Requests:",
            &summary.total_requests.to_string(),
        ]);
        table.add_row(vec![
            "Failed Requests:",
            &summary.failed_requests.to_string(),
        ]);
        table.add_row(vec![
            "Success Rate:",
            &format!("{:.1}%", summary.success_rate()),
        ]);
        table.add_row(vec![
            "Requests/sec:",
            &format!("{:.1}", summary.requests_per_second),
        ]);

        table.add_row(vec!["", ""]);
        table.add_row(vec!["Latency (ms)", "avg / max"]);
        table.add_row(vec![
            "",
            &format!("{:.1} / {:.1}", summary.latency_avg_ms, summary.latency_max_ms),
        ]);

        if summary.render_failures > 0 {
            table.add_row(vec![
                "Render Failures:",
                &summary.render_failures.to_string(),
            ]);
        }

        table.to_string()
    }

    /// Format the summary as indented JSON.
    pub fn format_json(summary: &BenchSummary) -> serde_json::Result<String> {
        to_indented_json(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> BenchSummary {
        BenchSummary {
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            query: "directpath".to_string(),
            target: "tcp://127.0.0.1:6000".to_string(),
            concurrency: 4,
            seed: 7,
            duration_secs: 10.0,
            total_requests: 200,
            successful_requests: 150,
            failed_requests: 50,
            render_failures: 0,
            requests_per_second: 20.0,
            latency_avg_ms: 12.5,
            latency_max_ms: 80.0,
        }
    }

    #[test]
    fn test_parse_report_format() {
        assert_eq!("table".parse::<ReportFormat>(), Ok(ReportFormat::Table));
        assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert_eq!("none".parse::<ReportFormat>(), Ok(ReportFormat::None));
        assert!("csv".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_table_contains_key_figures() {
        let table = ResultsReport::format_table(&summary());
        assert!(table.contains("Benchmark: directpath"));
        assert!(table.contains("75.0%"));
        assert!(table.contains("20.0"));
        assert!(table.contains("12.5 / 80.0"));
        assert!(!table.contains("Render Failures"));
    }

    #[test]
    fn test_json_round_trips() {
        let json = ResultsReport::format_json(&summary()).unwrap();
        let back: BenchSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.total_requests, 200);
        assert!(json.contains("\n  \"query\": \"directpath\""));
    }

    #[test]
    fn test_none_prints_nothing() {
        assert!(ResultsReport::format(&summary(), ReportFormat::None)
            .unwrap()
            .is_none());
    }
}
