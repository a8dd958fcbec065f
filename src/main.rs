use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use log::{info, warn};
use rayon::prelude::*;

use water_sort_levels::difficulty::{FIRST_LEVEL, LAST_LEVEL, check_stages};
use water_sort_levels::solver::{DEFAULT_BUDGET, Solver, Verdict};
use water_sort_levels::store::{JsonDirStore, LevelStore};
use water_sort_levels::{LevelBuilder, LevelRecord, WalkStrategy};

/// Generate the water sort level catalogue.
#[derive(Parser, Debug)]
#[command(name = "water-sort-levels", version, about, long_about = None)]
struct Args {
    /// Directory receiving the level_<id>.json files
    #[arg(short, long, default_value = "assets/levels")]
    out: PathBuf,

    /// First level to generate
    #[arg(long, default_value_t = FIRST_LEVEL)]
    first: u32,

    /// Last level to generate
    #[arg(long, default_value_t = LAST_LEVEL)]
    last: u32,

    /// Print a single level to stdout instead of writing the catalogue
    #[arg(short, long, conflicts_with_all = ["first", "last"])]
    level: Option<u32>,

    /// How the scramble moves tokens around
    #[arg(short, long, value_enum, default_value_t = Strategy::Pour)]
    strategy: Strategy,

    /// Search for a solution of every generated level
    #[arg(long, default_value_t = false)]
    verify: bool,

    /// States the solver may expand per level
    #[arg(long, default_value_t = DEFAULT_BUDGET, requires = "verify")]
    budget: usize,

    /// Print some statistics after generating the levels
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    Pour,
    Unpour,
}

impl From<Strategy> for WalkStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Pour => WalkStrategy::Pour,
            Strategy::Unpour => WalkStrategy::Unpour,
        }
    }
}

/// One generated level and what we learnt about it.
struct Outcome {
    record: LevelRecord,
    converged: bool,
    verdict: Option<Verdict>,
}

fn generate(builder: &LevelBuilder, level: u32, verify: Option<usize>) -> anyhow::Result<Outcome> {
    let (record, report) = builder
        .build_with_report(level)
        .with_context(|| format!("generating level {level}"))?;
    let verdict = match verify {
        Some(budget) => {
            let state = record.state()?;
            Some(Solver::new(state).with_budget(budget).solve())
        }
        None => None,
    };
    Ok(Outcome {
        record,
        converged: report.converged,
        verdict,
    })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();
    check_stages()?;

    let builder = LevelBuilder::new().with_strategy(args.strategy.into());
    let verify = args.verify.then_some(args.budget);

    if let Some(level) = args.level {
        let outcome = generate(&builder, level, verify)?;
        let mut stdout = io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &outcome.record)?;
        writeln!(stdout)?;
        if let Some(verdict) = &outcome.verdict {
            eprintln!("level {}: {}", outcome.record.id, describe(verdict));
        }
        return Ok(());
    }

    anyhow::ensure!(
        args.first <= args.last,
        "--first {} is after --last {}",
        args.first,
        args.last
    );
    info!(
        "Generating levels {}..={} into {}",
        args.first,
        args.last,
        args.out.display()
    );

    let outcomes: Vec<Outcome> = (args.first..=args.last)
        .into_par_iter()
        .map(|level| generate(&builder, level, verify))
        .collect::<anyhow::Result<_>>()?;

    let store = JsonDirStore::new(&args.out);
    outcomes
        .par_iter()
        .try_for_each(|outcome| store.save(&outcome.record))
        .with_context(|| format!("writing levels to {}", store.root().display()))?;

    let mut not_converged = 0;
    let mut solved = 0;
    let mut unsolvable = 0;
    let mut inconclusive = 0;
    for outcome in &outcomes {
        if !outcome.converged {
            not_converged += 1;
        }
        match &outcome.verdict {
            Some(Verdict::Solved(_)) => solved += 1,
            Some(verdict @ Verdict::Unsolvable) => {
                unsolvable += 1;
                warn!("Level {}: {}", outcome.record.id, describe(verdict));
            }
            Some(Verdict::Inconclusive) => inconclusive += 1,
            None => (),
        }
    }
    info!("Wrote {} levels", outcomes.len());

    if args.summary {
        println!(
            "
            levels = {}
     not converged = {}",
            outcomes.len(),
            not_converged
        );
        if args.verify {
            println!(
                "            solved = {solved}
        unsolvable = {unsolvable}
      inconclusive = {inconclusive}"
            );
        }
    }
    Ok(())
}

fn describe(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Solved(moves) => format!("solved in {} moves", moves.len()),
        Verdict::Unsolvable => "unsolvable".to_string(),
        Verdict::Inconclusive => "inconclusive, search budget exhausted".to_string(),
    }
}
