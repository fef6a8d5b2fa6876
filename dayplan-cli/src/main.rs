use anyhow::{Context, Result, bail};
use chrono::{Duration, NaiveDate};
use clap::{Parser, Subcommand};
use dayplan_core::{Scheduler, in_range, round_hours, time};
use dayplan_ingest::load_snapshot;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod ics;
mod render;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "dayplan",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("DAYPLAN_BUILD_SHA"), ")"),
    about = "Spread open tasks over the days before their deadlines"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Allocate hours per day for a task snapshot
    Plan {
        /// Task snapshot (.csv or .json)
        #[arg(long)]
        tasks: PathBuf,

        /// Category settings (.csv or .json); overrides categories in a JSON snapshot
        #[arg(long)]
        categories: Option<PathBuf>,

        /// First day to schedule (YYYY-MM-DD, default: today in the configured timezone)
        #[arg(long)]
        start: Option<String>,

        /// Print the outcome as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Replace the saved schedule from the start date onward
        #[arg(long, default_value_t = false)]
        save: bool,
    },

    /// Show the saved schedule
    Show {
        /// Default: today
        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Export the saved schedule as an ICS calendar (all-day events)
    ExportIcs {
        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show day classification and default limits
    Calendar {
        /// First day (default: today)
        date: Option<String>,

        /// Number of days to list
        #[arg(long, default_value_t = 14)]
        days: u32,
    },

    /// Manage ~/.dayplan/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Plan {
            tasks,
            categories,
            start,
            json,
            save,
        } => plan(tasks, categories, start, json, save)?,

        Command::Show { start, end, json } => show(start, end, json)?,

        Command::ExportIcs { start, end, output } => export_ics(start, end, output)?,

        Command::Calendar { date, days } => calendar(date, days)?,

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn resolve_date(arg: Option<&str>, tz: &str) -> Result<NaiveDate> {
    match arg {
        Some(s) => time::parse_date(s),
        None => time::today_in(tz),
    }
}

fn plan(
    tasks_path: PathBuf,
    categories_path: Option<PathBuf>,
    start: Option<String>,
    json: bool,
    save: bool,
) -> Result<()> {
    let cfg = config::load_config()?;
    let today = time::today_in(&cfg.calendar.timezone)?;
    let start = match start {
        Some(s) => time::parse_date(&s)?,
        None => today,
    };

    let snapshot = load_snapshot(&tasks_path, categories_path.as_deref())
        .with_context(|| format!("loading {}", tasks_path.display()))?;
    let tasks = snapshot.schedulable_tasks();
    info!(
        records = snapshot.tasks.len(),
        schedulable = tasks.len(),
        categories = snapshot.categories.len(),
        "snapshot loaded"
    );

    let scheduler = Scheduler::with_config(cfg.calendar(), cfg.scheduler_config());
    let outcome = scheduler.schedule(&tasks, &snapshot.categories, start, today);
    let titles: BTreeMap<String, String> =
        tasks.iter().map(|t| (t.id.clone(), t.title.clone())).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("# Plan from {}\n", render::day_label(start));
        if outcome.is_empty() {
            println!("(nothing to schedule)");
        } else {
            print!("{}", render::day_table(&outcome.allocations, &titles, scheduler.calendar()));
            println!("\nTotals:");
            print!("{}", render::totals(&outcome.allocations));
        }
        let report = render::shortfall_report(&outcome.shortfalls);
        if !report.is_empty() {
            println!();
            print!("{report}");
        }
    }

    if save {
        let path = state::schedule_path()?;
        let merged = state::read_schedule(&path)?.merge(outcome.allocations, titles, start);
        state::write_schedule(&path, &merged)?;
        eprintln!("Saved {} allocations to {}", merged.allocations.len(), path.display());
    }

    Ok(())
}

fn show(start: Option<String>, end: Option<String>, json: bool) -> Result<()> {
    let cfg = config::load_config()?;
    let start = resolve_date(start.as_deref(), &cfg.calendar.timezone)?;
    let end = end.as_deref().map(time::parse_date).transpose()?;
    if end.is_some_and(|e| e < start) {
        bail!("--end must not be before --start");
    }

    let saved = state::read_schedule(&state::schedule_path()?)?;
    let view = in_range(&saved.allocations, start, end);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }
    if view.is_empty() {
        println!("No saved allocations from {start}. Run: dayplan plan --tasks <file> --save");
        return Ok(());
    }
    let calendar = cfg.calendar();
    print!("{}", render::day_table(view, &saved.titles, calendar.as_ref()));
    Ok(())
}

fn export_ics(start: Option<String>, end: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let cfg = config::load_config()?;
    let start = resolve_date(start.as_deref(), &cfg.calendar.timezone)?;
    let end = end.as_deref().map(time::parse_date).transpose()?;

    let saved = state::read_schedule(&state::schedule_path()?)?;
    let ics = ics::allocations_to_ics(in_range(&saved.allocations, start, end), &saved.titles);

    match output {
        Some(path) => {
            std::fs::write(&path, ics).with_context(|| format!("write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{ics}"),
    }
    Ok(())
}

fn calendar(date: Option<String>, days: u32) -> Result<()> {
    let cfg = config::load_config()?;
    let first = resolve_date(date.as_deref(), &cfg.calendar.timezone)?;
    let cal = cfg.calendar();
    let defaults = cfg.defaults();
    let reduced_hours = defaults.weekend_holiday_hours.unwrap_or(defaults.weekday_hours);

    for offset in 0..i64::from(days) {
        let day = first + Duration::days(offset);
        let (kind, hours) = if cal.is_reduced_capacity_day(day) {
            let label = cal.describe(day).unwrap_or_else(|| "weekend".to_string());
            (label, reduced_hours)
        } else {
            ("weekday".to_string(), defaults.weekday_hours)
        };
        println!("{}  {:>6.2}h  {}", render::day_label(day), round_hours(hours), kind);
    }
    Ok(())
}
