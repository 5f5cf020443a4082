use anyhow::Result;
use std::path::PathBuf;

use albumsort::api::HttpLibrary;
use albumsort::config::Config;
use albumsort::logging;
use albumsort::notify::ConsoleSink;
use albumsort::organize::{MigrationOutcome, ReorganizeSummary};
use albumsort::{AlbumId, ReorganizeWorkflow, WorkflowOutcome};

struct Args {
    config_path: Option<PathBuf>,
    dry_run: bool,
    album_id: String,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path = None;
    let mut dry_run = false;
    let mut album_id = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("albumsort {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--dry-run" | "-n" => {
                dry_run = true;
            }
            arg if arg.starts_with('-') => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
            arg => {
                if album_id.is_some() {
                    eprintln!("Error: only one album id may be given");
                    std::process::exit(1);
                }
                album_id = Some(arg.to_string());
            }
        }
        i += 1;
    }

    let Some(album_id) = album_id else {
        eprintln!("Error: missing album id");
        print_help();
        std::process::exit(1);
    };

    Args {
        config_path,
        dry_run,
        album_id,
    }
}

fn print_help() {
    println!(
        r#"albumsort - split an album into one album per tag combination

USAGE:
    albumsort [OPTIONS] <ALBUM_ID>

OPTIONS:
    --config, -c PATH   Path to config file
    --dry-run, -n       Show the albums that would be created, change nothing
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    ALBUMSORT_CONFIG    Path to config file (overrides default location)
    ALBUMSORT_API_KEY   API key for the photo server
    ALBUMSORT_LOG       Log level (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/albumsort/config.toml"#
    );
}

fn print_summary(summary: &ReorganizeSummary) {
    for group in &summary.groups {
        match &group.outcome {
            MigrationOutcome::Migrated { asset_ids, .. } => {
                println!("  {} ({} assets)", group.album_name, asset_ids.len());
            }
            MigrationOutcome::Partial {
                migrated, rejected, ..
            } => {
                println!(
                    "  {} ({} assets, {} refused)",
                    group.album_name,
                    migrated.len(),
                    rejected.len()
                );
            }
            MigrationOutcome::Failed { orphan, error } => {
                eprintln!("  {} failed: {}", group.album_name, error);
                if let Some(id) = orphan {
                    eprintln!("    empty album left behind: {}", id);
                }
            }
        }
    }
    if !summary.tag_failures.is_empty() {
        eprintln!(
            "  {} assets skipped because their tags could not be read",
            summary.tag_failures.len()
        );
    }
    if let Some(removal) = &summary.removal {
        let stuck = removal.failed_ids();
        if !stuck.is_empty() {
            eprintln!(
                "  {} migrated assets are still in '{}'",
                stuck.len(),
                summary.source_name
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args();

    // Logging is best effort; the notifications still reach the terminal.
    let _ = logging::init(None);

    let config = match &args.config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let library = HttpLibrary::new(&config.server);
    let sink = ConsoleSink;
    let options = config.organize_options(args.dry_run);

    tracing::info!(
        album_id = %args.album_id,
        endpoint = %library.endpoint(),
        dry_run = args.dry_run,
        "Reorganizing album"
    );

    let workflow = ReorganizeWorkflow::new(&library, &sink, options);
    match workflow.run(&AlbumId(args.album_id)).await {
        WorkflowOutcome::Completed(summary) => print_summary(&summary),
        WorkflowOutcome::Planned(plan) => {
            for album in &plan {
                println!("  {} ({} assets)", album.name, album.asset_ids.len());
            }
        }
        WorkflowOutcome::NothingToDo(_) => {}
        WorkflowOutcome::Aborted(_) => std::process::exit(1),
    }

    Ok(())
}
