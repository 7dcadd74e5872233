//! `parcel build`: one incremental pass per selected target.
//!
//! 1. Find project root and load `parcel.toml`
//! 2. Resolve the selected targets
//! 3. Run the pass through the host cache
//! 4. Print a summary per target

use parcel_build::ExitCode;
use parcel_cache::{BuildCache, TargetReport};
use tracing::debug;

use crate::pipeline::load_project;
use crate::{BuildArgs, GlobalArgs};

/// Runs the `parcel build` command. Returns exit code 0 on success.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global, &args.target)?;

    if !global.quiet {
        eprintln!(
            "   Building {} v{}",
            project.config.project.name, project.config.project.version
        );
    }

    debug!(
        targets = project.targets.len(),
        rebuild = args.rebuild,
        "starting build"
    );
    let reports = BuildCache::new(env!("CARGO_PKG_VERSION"))
        .with_rebuild(args.rebuild)
        .build(&project.targets)?;

    if !global.quiet {
        for report in &reports {
            eprintln!("{}", summary_line(report));
        }
    }
    Ok(0)
}

/// One-line summary of a target's pass.
fn summary_line(report: &TargetReport) -> String {
    let summary = &report.summary;
    match summary.exit {
        ExitCode::NothingDone => format!("    Fresh {}", report.name),
        ExitCode::Ok => {
            let mut line = format!(
                "  Compiled {}: {} source(s), {} facade(s)",
                report.name,
                summary.compiled.len(),
                summary.facades.len()
            );
            if !summary.skipped.is_empty() {
                line.push_str(&format!(", {} empty package(s)", summary.skipped.len()));
            }
            if !report.reclaimed.is_empty() {
                line.push_str(&format!(", {} stale output(s) removed", report.reclaimed.len()));
            }
            line
        }
    }
}
