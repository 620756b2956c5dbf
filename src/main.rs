// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus CLI entrypoint.
//!
//! Opens a data directory in local-only mode, activates a project, and prints
//! a summary of its chart. This is the headless harness around the sync core;
//! a UI front end drives the same `SyncEngine` API.

use std::error::Error;

use tracing_subscriber::EnvFilter;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<data-dir>] [--project <id>] [--durable-writes]\n  {program} [--data <dir>] [--project <id>] [--durable-writes]\n  {program} --demo\n\nIf data-dir/--data is omitted, the current working directory is used.\n--project selects a project id; the default is the main project (created on\nfirst run).\n--demo opens a built-in demo chart in a throwaway directory and cannot be\ncombined with data-dir/--data.\n\n--durable-writes opts into slower, best-effort durable persistence\n(fsync/sync where supported)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    data_dir: Option<String>,
    project_id: Option<String>,
    durable_writes: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--data" => {
                if options.data_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.data_dir = Some(dir);
            }
            "--project" => {
                if options.project_id.is_some() {
                    return Err(());
                }
                let id = args.next().ok_or(())?;
                options.project_id = Some(id);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.data_dir.is_some() {
                    return Err(());
                }
                options.data_dir = Some(arg);
            }
        }
    }

    if options.demo && options.data_dir.is_some() {
        return Err(());
    }

    Ok(options)
}

fn open_cache(dir: impl Into<std::path::PathBuf>, durable: bool) -> proteus::store::LocalCache {
    if durable {
        proteus::store::LocalCache::new(dir)
            .with_durability(proteus::store::WriteDurability::Durable)
    } else {
        proteus::store::LocalCache::new(dir)
    }
}

fn print_chart_summary(engine: &proteus::sync::SyncEngine) {
    let Some(project_id) = engine.active_project_id() else {
        println!("no active project");
        return;
    };
    let name = engine
        .workspace()
        .project(project_id)
        .map(|p| p.name.as_str())
        .unwrap_or("(unnamed)");
    let Some(chart) = engine.chart() else {
        return;
    };

    println!("project {project_id} ({name})");
    println!("  main coordinators: {}", chart.main_coordinators.len());
    println!("  coordinators:      {}", chart.coordinators.len());
    println!("  sub-units:         {}", chart.sub_unit_count());
    println!("  people:            {}", chart.person_count());
    for coordinator in &chart.coordinators {
        println!(
            "  - {} ({} sub-units, {} deputies)",
            coordinator.title,
            coordinator.sub_units.len(),
            coordinator.deputies.len()
        );
    }
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();

        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "proteus".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let mut engine = if options.demo {
            let now_millis = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0);
            let demo_dir = std::env::temp_dir()
                .join(format!("proteus-demo-{}-{now_millis}", std::process::id()));

            let mut engine =
                proteus::sync::SyncEngine::new_local(open_cache(&demo_dir, options.durable_writes));
            let project_id = engine.create_project(proteus::sync::DEFAULT_PROJECT_NAME);
            open_cache(&demo_dir, options.durable_writes)
                .save_chart(&project_id, &proteus::model::fixtures::demo_chart())?;
            engine.activate_project(&project_id);
            engine
        } else {
            let dir = options.data_dir.unwrap_or_else(|| ".".to_owned());
            let mut engine =
                proteus::sync::SyncEngine::new_local(open_cache(dir, options.durable_writes));

            let project_id = match options.project_id {
                Some(raw) => proteus::model::ProjectId::new(raw)?,
                None => engine.ensure_default_project(),
            };
            engine.activate_project(&project_id);
            engine
        };

        // Activation repairs are already persisted; pump is a no-op in
        // local-only mode but keeps the call sequence uniform.
        engine.pump();
        print_chart_summary(&engine);

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("proteus: {err}");
        std::process::exit(1);
    }
}
