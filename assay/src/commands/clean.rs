// assay/src/commands/clean.rs
//
// USE CASE: Clean build artifacts.

use std::path::PathBuf;

use assay_core::application::clean_project;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    match clean_project(&project_dir) {
        Ok(report) => {
            for (target, files) in report.removed {
                println!("   🗑️  Artifact removed: {} ({} files)", target, files);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Clean failed: {}", e);
            std::process::exit(1);
        }
    }
}
