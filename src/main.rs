use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use change_timeline::{
    load_change_logs, read_change_log, sort_for_listing, ChangeFilter, Granularity, ReportConfig, RuleEngine,
    TimelineReport, DEFAULT_ROW_WIDTH,
};

/// Turn control-plane configuration logs into a per-database timeline
#[derive(Debug, Parser)]
#[command(name = "change-timeline", version)]
struct Cli {
    /// CSV exports to process (stdin when none)
    #[arg(short = 'f', long = "file")]
    files: Vec<PathBuf>,

    /// Report only these databases
    #[arg(short = 'd', long, value_delimiter = ',')]
    databases: Vec<String>,

    /// Bucket by hour instead of by day
    #[arg(long)]
    hourly: bool,

    /// Report title
    #[arg(short = 't', long, default_value = "")]
    title: String,

    /// Write here instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Legend entries per row
    #[arg(long, default_value_t = DEFAULT_ROW_WIDTH)]
    legend_width: usize,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    since: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    until: Option<NaiveDate>,

    /// Print one line per event instead of the timeline JSON
    #[arg(long)]
    list: bool,

    /// With --list, sort by database before timestamp
    #[arg(short = 'b', long)]
    dbsort: bool,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn report_config(&self) -> ReportConfig {
        ReportConfig {
            title: self.title.clone(),
            granularity: if self.hourly { Granularity::Hourly } else { Granularity::Daily },
            legend_width: self.legend_width,
            filter: ChangeFilter {
                databases: self.databases.clone(),
                since: self.since,
                until: self.until,
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = cli.report_config();
    config.validate().context("Invalid options")?;

    let records = if cli.files.is_empty() {
        read_change_log(io::stdin().lock(), "STDIN", &config.filter)?
    } else {
        load_change_logs(&cli.files, &config.filter)?
    };

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Unable to write to output file {:?}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if cli.list {
        let mut events = RuleEngine::canonical().classify_all(&records);
        sort_for_listing(&mut events, cli.dbsort);
        for event in &events {
            writeln!(out, "{}", event.summary_line())?;
        }
    } else {
        let report = TimelineReport::build(&records, &config)?;
        log::info!(
            "Timeline: {} buckets, {} databases, {} events",
            report.timeline.len(),
            report.entities.len(),
            report.timeline.event_count()
        );
        serde_json::to_writer_pretty(&mut out, &report).context("Failed to write timeline")?;
        writeln!(out)?;
    }

    out.flush()?;
    Ok(())
}
