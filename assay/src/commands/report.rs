// assay/src/commands/report.rs
//
// USE CASE: Print the metrics of the published snapshot.

use std::path::PathBuf;

use anyhow::Context;
use assay_core::application::load_report;
use assay_core::domain::quality::QualityReport;
use comfy_table::{Table, presets::UTF8_FULL};

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let report = load_report(&project_dir)
        .with_context(|| format!("Failed to read published metrics in {:?}", project_dir))?;

    println!("📊 Data quality report");
    println!("{}", summary_table(&report));

    for (table, metrics) in &report.entities {
        println!("\n📋 Metrics of '{}'", table);
        let mut detail = Table::new();
        detail
            .load_preset(UTF8_FULL)
            .set_header(vec!["metric", "value"]);
        for (name, value) in metrics.to_metric_map() {
            detail.add_row(vec![name, value.to_string()]);
        }
        println!("{}", detail);
    }

    Ok(())
}

fn summary_table(report: &QualityReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "table",
        "raw_total",
        "duplicates",
        "clean",
        "rejected",
        "clean_pct",
        "orphaned",
    ]);
    for (name, m) in &report.entities {
        table.add_row(vec![
            name.clone(),
            m.raw_total.to_string(),
            m.duplicates.to_string(),
            m.clean.to_string(),
            m.rejected.to_string(),
            format!("{:.2}%", m.clean_pct),
            m.orphaned_events
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}
