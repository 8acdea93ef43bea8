//! Human-readable run output printed to stdout.

use crate::domain::model::{BatchSummary, ProcessingReport};

const RULE_WIDTH: usize = 60;

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn banner(file_count: usize) -> Vec<String> {
    vec![
        rule(),
        "TARUCCA DATA PROCESSOR".to_string(),
        rule(),
        format!("Found {} file(s) to process\n", file_count),
    ]
}

pub fn processing_line(input_file: &str) -> String {
    format!("📁 Processing: {}", input_file)
}

pub fn file_result(report: &ProcessingReport) -> Vec<String> {
    let mut lines = Vec::new();

    if report.is_success() {
        lines.push(format!(
            "   ✅ Success: {} records processed",
            report.records_processed
        ));
        lines.push(format!(
            "   📊 Output: {}",
            report.output_file.as_deref().unwrap_or("-")
        ));
        if report.records_invalid > 0 {
            lines.push(format!(
                "   ⚠️  Warning: {} invalid records skipped",
                report.records_invalid
            ));
        }
    } else {
        lines.push(format!(
            "   ❌ Error: {}",
            report.error.as_deref().unwrap_or("Unknown error")
        ));
    }

    lines
}

pub fn summary(summary: &BatchSummary) -> Vec<String> {
    vec![
        rule(),
        format!(
            "SUMMARY: {}/{} files processed successfully",
            summary.success_count(),
            summary.total()
        ),
        rule(),
    ]
}
