//! Command-line entry point: score contest logs into Cabrillo files.

use std::path::PathBuf;

use chrono::{NaiveDateTime, Utc};
use clap::{Args, Parser};
use log::error;

use cabscore::contest::{self, BuildOptions, ContestKind};
use cabscore::history::History;
use cabscore::run::{self, RunOptions};
use cabscore::score::ErrorPolicy;
use cabscore::settings::StationSettings;

#[derive(Parser)]
#[command(name = "cabscore", version, about = "Score ADIF contest logs and write Cabrillo submissions")]
struct Cli {
    /// ADIF or simplified .LOG input files.
    #[arg(short = 'i', long = "input", required = true, num_args = 1.., value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Cabrillo output file. Defaults to <contest>.cbr.
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Exchange history CSV for cross-checking.
    #[arg(long, value_name = "FILE")]
    hist: Option<PathBuf>,

    /// Station settings JSON.
    #[arg(long, env = "CABSCORE_SETTINGS", default_value = "settings.json", value_name = "FILE")]
    settings: PathBuf,

    /// Contest window start override, "YYYYMMDD HHMM" UTC. Needs --hours.
    #[arg(long, value_name = "WHEN", requires = "hours")]
    start: Option<String>,

    /// Contest window length override in hours.
    #[arg(long, value_name = "HOURS", requires = "start")]
    hours: Option<i64>,

    /// Log and skip bad records instead of aborting on the first one.
    #[arg(long)]
    lenient: bool,

    /// List exact and similar-call contacts for CALL instead of scoring.
    #[arg(long, value_name = "CALL")]
    call: Option<String>,

    #[command(flatten)]
    contest: ContestFlags,
}

/// Exactly one contest selector.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct ContestFlags {
    /// CQ WW DX, CW weekend.
    #[arg(long)]
    cqww: bool,
    /// CQ WW DX, SSB weekend.
    #[arg(long)]
    cqww_ssb: bool,
    /// CQ WW DX, RTTY weekend.
    #[arg(long)]
    cqww_rtty: bool,
    /// CQ WPX, CW weekend.
    #[arg(long)]
    wpx: bool,
    /// CQ WPX, RTTY weekend.
    #[arg(long)]
    wpx_rtty: bool,
    /// ARRL CW Sweepstakes.
    #[arg(long)]
    cwss: bool,
    /// IARU HF Championship.
    #[arg(long)]
    iaru: bool,
    /// ARRL Field Day.
    #[arg(long)]
    fd: bool,
    /// North American QSO Party, CW.
    #[arg(long)]
    naqp: bool,
    /// North American QSO Party, RTTY.
    #[arg(long)]
    naqp_rtty: bool,
    /// California QSO Party.
    #[arg(long)]
    cqp: bool,
    /// ARRL VHF contest.
    #[arg(long)]
    vhf: bool,
    /// CQ WW VHF contest.
    #[arg(long)]
    cq_vhf: bool,
    /// CWops mini-test, with an optional session start hour (3/7/13/19).
    #[arg(long, value_name = "SESSION", num_args = 0..=1, default_missing_value = "19")]
    cwt: Option<u32>,
    /// World Wide Digi DX.
    #[arg(long)]
    wwdigi: bool,
}

impl ContestFlags {
    fn kind(&self) -> ContestKind {
        if self.cqww {
            ContestKind::CqWwCw
        } else if self.cqww_ssb {
            ContestKind::CqWwSsb
        } else if self.cqww_rtty {
            ContestKind::CqWwRtty
        } else if self.wpx {
            ContestKind::WpxCw
        } else if self.wpx_rtty {
            ContestKind::WpxRtty
        } else if self.cwss {
            ContestKind::SweepstakesCw
        } else if self.iaru {
            ContestKind::IaruHf
        } else if self.fd {
            ContestKind::FieldDay
        } else if self.naqp {
            ContestKind::NaqpCw
        } else if self.naqp_rtty {
            ContestKind::NaqpRtty
        } else if self.cqp {
            ContestKind::Cqp
        } else if self.vhf {
            ContestKind::ArrlVhf
        } else if self.cq_vhf {
            ContestKind::CqVhf
        } else if let Some(session) = self.cwt {
            ContestKind::Cwt(Some(session))
        } else {
            // The clap group guarantees exactly one selector.
            debug_assert!(self.wwdigi);
            ContestKind::WwDigi
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = score(Cli::parse()) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn score(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = StationSettings::load(&cli.settings)?;
    let history = match &cli.hist {
        Some(path) => History::load(path)?,
        None => History::empty(),
    };

    let window_override = match (&cli.start, cli.hours) {
        (Some(start), Some(hours)) => {
            let start = NaiveDateTime::parse_from_str(start, "%Y%m%d %H%M")?;
            Some((start, hours))
        }
        _ => None,
    };
    let policy = if cli.lenient {
        ErrorPolicy::Lenient
    } else {
        ErrorPolicy::Strict
    };
    let build = BuildOptions {
        now: Utc::now().naive_utc(),
        policy,
        window_override,
    };
    let mut scorer = contest::build(&cli.contest.kind(), &settings, &build);
    let contest_name = scorer.contest();

    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.cbr", contest_name.to_ascii_lowercase())));
    let opts = RunOptions {
        inputs: cli.inputs,
        output,
        history,
    };

    if let Some(call) = &cli.call {
        for line in run::audit_call(call, scorer.as_mut(), &opts)? {
            println!("{line}");
        }
        return Ok(());
    }

    let report = run::run(scorer.as_mut(), &settings, &opts)?;
    let s = &report.summary;
    println!("Contest:       {contest_name}");
    println!("Raw QSOs:      {}", s.raw_qsos);
    println!("Unique QSOs:   {}", s.unique_qsos);
    println!("Dupes:         {}", s.dupes);
    println!("Skipped:       {}", s.skipped);
    println!("QSO points:    {}", s.total_points);
    println!("Multipliers:   {}", s.multipliers);
    println!("Claimed score: {}", s.claimed_score);
    for line in &s.detail {
        println!("  {line}");
    }
    if !report.inconsistencies.is_empty() {
        println!("Exchange inconsistencies:");
        for line in &report.inconsistencies {
            println!("  {line}");
        }
    }
    for line in &report.operating {
        println!("{line}");
    }
    Ok(())
}
