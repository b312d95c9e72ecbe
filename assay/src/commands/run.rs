// assay/src/commands/run.rs
//
// USE CASE: Run the pipeline and publish the snapshot.

use std::path::PathBuf;

use anyhow::Context;
use assay_core::AssayError;
use assay_core::application::run_pipeline;
use assay_core::infrastructure::adapters::{FileSnapshotSink, JsonDirectorySource};
use assay_core::infrastructure::config::project::load_project_config;
use assay_core::infrastructure::fs::atomic_write;

pub async fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    // A. Load the Config (Infra)
    println!("⚙️  Loading configuration...");
    let config = load_project_config(&project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    println!("   Project: {} (v{})", config.name, config.version);
    if config.governance.strict {
        println!("    🔒 Strict Governance Mode: ON");
    } else {
        println!("    🔓 Strict Governance Mode: OFF");
    }

    // B. Wire the adapters
    let input_dir = project_dir.join(&config.input_path);
    let target_dir = project_dir.join(&config.target_path);
    println!("📥 Reading raw collections from {}", input_dir.display());
    let source = JsonDirectorySource::new(&input_dir);
    let sink = FileSnapshotSink::new(&target_dir);
    tracing::debug!(input = ?input_dir, target = ?target_dir, "Adapters wired");

    // C. Run the Pipeline (Application Layer)
    match run_pipeline(&source, &sink, &config).await {
        Ok(run_res) => {
            for warning in &run_res.warnings {
                eprintln!("⚠️  [Bypass] {} (Strict Mode: OFF)", warning);
            }
            let results = serde_json::to_string_pretty(&run_res)?;
            atomic_write(target_dir.join("run_results.json"), results)
                .context("Failed to write run_results.json")?;

            println!(
                "📦 Published {} clean rows, {} rejected rows to {}",
                run_res.clean_rows,
                run_res.rejected_rows,
                sink.snapshot_dir().display()
            );
            println!("\n✨ SUCCESS! Pipeline finished in {:.2?}", start.elapsed());
        }
        Err(e) => {
            eprintln!("\n💥 CRITICAL PIPELINE ERROR: {}", e);
            if let Some(help) = help_for(&e) {
                eprintln!("👉 {}", help);
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Help text of the underlying diagnostic, if it carries one.
fn help_for(err: &AssayError) -> Option<String> {
    use miette::Diagnostic;
    match err {
        AssayError::Domain(e) => e.help().map(|h| h.to_string()),
        AssayError::Infrastructure(e) => e.help().map(|h| h.to_string()),
        _ => None,
    }
}
