// assay/src/commands/inspect.rs
//
// USE CASE: Print sample rows of a published clean or rejected table.

use std::path::PathBuf;

use assay_core::application::sample_rows;
use assay_core::domain::entity::Entity;

pub fn execute(
    project_dir: PathBuf,
    entity: String,
    rejected: bool,
    limit: usize,
) -> anyhow::Result<()> {
    let entity: Entity = entity
        .parse()
        .map_err(|e| anyhow::anyhow!("❌ {}", e))?;
    let rows = match sample_rows(&project_dir, entity, rejected, limit) {
        Ok(rows) => rows,
        Err(e) => anyhow::bail!("❌ {}\n👉 Have you run 'assay run'?", e),
    };

    let set = if rejected { "rejected" } else { "clean" };
    println!("\n🔍 Inspecting {} table: '{}'", set, entity.table());
    println!("   --- Rows (Limit {}) ---", limit);

    for row in rows {
        println!("   ➜ {}", serde_json::to_string(&row)?);
    }

    Ok(())
}
