pub mod prompt;
pub mod report;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing::level_filters::LevelFilter;

use crate::storage::Store;
use crate::tracker::{parse_time_span, Error, Project, SessionChange};
use crate::utils::dir::create_application_default_path;
use crate::utils::logging::enable_logging;

const USAGE_NOTES: &str = "\
names:
  Projects are arranged hierarchically using \"/\". For example, you could
  have a parent project called \"school\" and create a child project using:

      tally new school/cs193

  The full path name of that new project is \"school/cs193\", and the stats
  for \"school\" also count time tracked on \"school/cs193\".

suffix matching:
  Typing out full path names is annoying, so names also match by suffix.
  With only \"school\" and \"school/cs193\" around, any of these start
  \"school/cs193\":

      tally start 3
      tally start 93
      tally start 193

  When several projects share a matching suffix you are prompted to pick
  one by number.

times:
  Time spans count back from now. Recognized units and abbreviations:

      Hours  - hour,  hr, h
      Days   - day,   dy, d
      Weeks  - week,  wk, w
      Months - month, mo, m
      Years  - year,  yr, y

  Span parsing is flexible, so any of these work:

      1w3d5y
      4 weeks
      14 weeks 2 hours

storage:
  Everything lives in one JSON file, by default tally.json inside the
  application directory.";

#[derive(Parser, Debug)]
#[command(name = "tally", version)]
#[command(about = "Command line time tracking with hierarchical projects", long_about = None)]
#[command(after_long_help = USAGE_NOTES)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        help = "Tracking file. By default tally.json inside $XDG_STATE_HOME or $HOME/.local/state"
    )]
    file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Register a new project")]
    New { name: String },
    #[command(about = "Start tracking a project")]
    Start { name: String, note: Option<String> },
    #[command(about = "Stop tracking a project")]
    Stop { name: String, note: Option<String> },
    #[command(name = "s", about = "Toggle tracking of a project on or off")]
    Toggle { name: String, note: Option<String> },
    #[command(about = "Archive a project so it's not seen any more")]
    Archive { name: String },
    #[command(about = "Recover a project so it's not archived any more")]
    Recover { name: String },
    #[command(about = "Show how long each project has been running")]
    Stats {
        #[arg(help = "Time span like \"1w3d\" or \"4 weeks\". Defaults to a week")]
        span: Vec<String>,
    },
    #[command(about = "Print a timecard for a project")]
    Timecard {
        name: String,
        #[arg(help = "Time span like \"1w3d\" or \"4 weeks\". Defaults to a week")]
        span: Vec<String>,
    },
    #[command(alias = "recalculate", about = "Recompute the stored duration of every entry")]
    Recalc {},
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse();

    let data_path = create_application_default_path()?;
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&data_path, logging_level, args.log)?;

    let store_path = args
        .file
        .clone()
        .unwrap_or_else(|| data_path.join("tally.json"));
    debug!("Using store at {store_path:?}");

    let mut store = Store::load(&store_path)?;
    let now = Utc::now();

    let did_edit = match args.command {
        None => {
            for line in report::status_lines(&store.root, now) {
                println!("{line}");
            }
            false
        }
        Some(Commands::New { name }) => {
            store.root.insert(&name)?;
            println!("created project \"{name}\"");
            true
        }
        Some(Commands::Start { name, note }) => {
            let path = resolve_interactively(&store.root, &name)?;
            let project = project_mut(&mut store.root, &path)?;
            let started = project.start(now, note)?;
            println!(
                "started \"{path}\" at {}",
                started.with_timezone(&Local).format("%H:%M")
            );
            true
        }
        Some(Commands::Stop { name, note }) => {
            let path = resolve_interactively(&store.root, &name)?;
            let project = project_mut(&mut store.root, &path)?;
            let duration = project.stop(now, note)?;
            println!(
                "stopped \"{path}\" after a duration of {}",
                report::format_duration(duration)
            );
            true
        }
        Some(Commands::Toggle { name, note }) => {
            let path = resolve_interactively(&store.root, &name)?;
            let project = project_mut(&mut store.root, &path)?;
            match project.toggle(now, note)? {
                SessionChange::Started(started) => println!(
                    "started \"{path}\" at {}",
                    started.with_timezone(&Local).format("%H:%M")
                ),
                SessionChange::Stopped(duration) => println!(
                    "stopped \"{path}\" after a duration of {}",
                    report::format_duration(duration)
                ),
            }
            true
        }
        Some(Commands::Archive { name }) => {
            let path = resolve_interactively(&store.root, &name)?;
            project_mut(&mut store.root, &path)?.archive(now);
            println!("archived \"{path}\"");
            true
        }
        Some(Commands::Recover { name }) => {
            let path = resolve_interactively(&store.root, &name)?;
            project_mut(&mut store.root, &path)?.recover();
            println!("recovered \"{path}\"");
            true
        }
        Some(Commands::Stats { span }) => {
            let span = parse_time_span(&span.join(" "), now);
            println!("Stats for the past {}:", span.label);
            for line in report::stats_lines(&store.root, &span, now) {
                println!("{line}");
            }
            false
        }
        Some(Commands::Timecard { name, span }) => {
            let span = parse_time_span(&span.join(" "), now);
            let path = resolve_interactively(&store.root, &name)?;
            let project = store
                .root
                .node(&path)
                .ok_or_else(|| Error::NotFound(path.clone()))?;
            for line in report::timecard_lines(project, &path, &span, &store.config, now) {
                println!("{line}");
            }
            false
        }
        Some(Commands::Recalc {}) => {
            store.root.recalculate();
            println!("recalculated all entry durations");
            true
        }
    };

    if did_edit {
        store.save(&store_path)?;
    }
    Ok(())
}

/// Resolves a name the way every command does: an unambiguous match goes
/// straight through, several matches ask the user to pick one.
fn resolve_interactively(root: &Project, name: &str) -> Result<String> {
    let matches = root.resolve(name)?;
    if matches.len() == 1 {
        return Ok(matches[0].path.clone());
    }

    let stdin = io::stdin();
    let selection = prompt::choose(name, &matches, stdin.lock(), io::stdout())?;
    Ok(matches[selection].path.clone())
}

fn project_mut<'a>(root: &'a mut Project, path: &str) -> Result<&'a mut Project> {
    Ok(root
        .node_mut(path)
        .ok_or_else(|| Error::NotFound(path.to_string()))?)
}
