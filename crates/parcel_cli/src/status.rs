//! `parcel status`: source changes since the last successful pass.

use parcel_cache::{BuildCache, ChangeSet};

use crate::pipeline::load_project;
use crate::{GlobalArgs, ReportFormat, StatusArgs};

/// Runs the `parcel status` command. Never writes anything.
pub fn run(args: &StatusArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global, &args.target)?;
    let cache = BuildCache::new(env!("CARGO_PKG_VERSION"));

    let mut rows = Vec::with_capacity(project.targets.len());
    for sources in &project.targets {
        rows.push((sources.target.name.clone(), cache.status(sources)?));
    }

    match args.format {
        ReportFormat::Text => {
            for (name, changes) in &rows {
                println!("{}", status_line(name, changes));
            }
        }
        ReportFormat::Json => {
            let json: Vec<serde_json::Value> = rows
                .iter()
                .map(|(name, changes)| status_json(name, changes))
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(0)
}

fn status_line(name: &str, changes: &ChangeSet) -> String {
    if changes.is_empty() {
        format!("{name}: up to date")
    } else {
        format!(
            "{name}: {} new, {} modified, {} deleted",
            changes.new_files.len(),
            changes.modified_files.len(),
            changes.deleted_files.len()
        )
    }
}

fn status_json(name: &str, changes: &ChangeSet) -> serde_json::Value {
    serde_json::json!({
        "target": name,
        "new": changes.new_files,
        "modified": changes.modified_files,
        "deleted": changes.deleted_files,
        "unchanged": changes.unchanged_files.len(),
    })
}
