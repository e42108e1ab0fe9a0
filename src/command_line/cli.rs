#![allow(clippy::cast_precision_loss)]

use clap::{ArgAction, Args, Parser, Subcommand};
use crossword_csp::crossword::Crossword;
use crossword_csp::crossword::parse::parse_files;
use crossword_csp::crossword::render::Rendered;
use crossword_csp::csp::Assignment;
use crossword_csp::csp::arc_consistency::WorklistType;
use crossword_csp::csp::search::SearchStats;
use crossword_csp::csp::value_ordering::ValueOrderingType;
use crossword_csp::csp::variable_selection::VariableSelectionType;
use crossword_csp::csp::{CrosswordCreator, SolveStatus, SolverOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface for the crossword generator.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "crossword-csp",
    version,
    about = "Fills a crossword grid with words from a word list",
    args_conflicts_with_subcommands = true
)]
pub(crate) struct Cli {
    /// Structure file, or a directory whose `.txt` files are all solved with the same words.
    pub structure: Option<PathBuf>,

    /// Word list, one word per line.
    pub words: Option<PathBuf>,

    /// Where to write the filled grid, as plain text (not an image). Only valid with a single
    /// structure file.
    pub output: Option<PathBuf>,

    /// Specifies the subcommand to execute.
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines the options controlling a solve.
#[derive(Args, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Enable debug output, providing more verbose logging during the solving process.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check the found fill against every constraint before printing it.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) verify: bool,

    /// Print problem and search statistics after solving.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) stats: bool,

    /// How the next slot to fill is chosen.
    #[arg(long, default_value_t = VariableSelectionType::MrvDegree)]
    variable_selection: VariableSelectionType,

    /// In which order the candidate words of a slot are tried.
    #[arg(long, default_value_t = ValueOrderingType::LeastConstraining)]
    value_ordering: ValueOrderingType,

    /// Worklist discipline of the arc consistency engine.
    #[arg(long, default_value_t = WorklistType::Fifo)]
    worklist: WorklistType,

    /// Do not maintain arc consistency after each decision.
    #[arg(long, default_value_t = false)]
    no_inference: bool,

    /// Give up after this many seconds of search.
    #[arg(long, value_name = "SECS")]
    time_limit: Option<u64>,
}

impl CommonOptions {
    /// Converts the command-line options into the options of a solving session.
    pub(crate) const fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            variable_selection: self.variable_selection,
            value_ordering: self.value_ordering,
            worklist: self.worklist,
            inference: !self.no_inference,
            time_limit: match self.time_limit {
                Some(secs) => Some(Duration::from_secs(secs)),
                None => None,
            },
        }
    }
}

/// Solves every `.txt` structure file under `dir` with the words in `words`.
///
/// Files that do not parse as a structure (such as word lists kept next to the grids) are
/// skipped with a warning.
///
/// # Errors
///
/// If `dir` is not a directory, or if a fill fails verification.
pub(crate) fn solve_dir(dir: &Path, words: &Path, common: &CommonOptions) -> Result<(), String> {
    if !dir.is_dir() {
        return Err(format!("Provided path is not a directory: {}", dir.display()));
    }

    for entry in walkdir::WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();

        if !file_path.is_file() {
            continue;
        }

        if file_path.extension().is_none_or(|ext| ext != "txt") {
            log::debug!("Skipping non-structure file: {}", file_path.display());
            continue;
        }

        if file_path == words {
            continue;
        }

        let time = Instant::now();
        match parse_files(file_path, words) {
            Ok(puzzle) => {
                let parse_time = time.elapsed();
                solve_and_report(&puzzle, common, Some(file_path), parse_time, None)?;
            }
            Err(e) => log::warn!("Skipping {}: {e}", file_path.display()),
        }
    }

    Ok(())
}

/// Parses one structure file and its word list, then solves and reports.
///
/// # Errors
///
/// If either file cannot be parsed, the fill fails verification or `output` cannot be
/// written.
pub(crate) fn solve_file(
    structure: &Path,
    words: &Path,
    output: Option<&Path>,
    common: &CommonOptions,
) -> Result<(), String> {
    let time = Instant::now();
    let puzzle =
        parse_files(structure, words).map_err(|e| format!("error[{}]: {e}", e.code()))?;
    let parse_time = time.elapsed();

    solve_and_report(&puzzle, common, Some(structure), parse_time, output)
}

/// Solves a puzzle, then prints statistics, verification and the grid.
///
/// # Errors
///
/// If the fill fails verification or `output` cannot be written.
pub(crate) fn solve_and_report(
    puzzle: &Crossword,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
    output: Option<&Path>,
) -> Result<(), String> {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }

    let mut creator = CrosswordCreator::with_options(puzzle, common.solver_options());
    let time = Instant::now();
    let status = creator.solve();
    let elapsed = time.elapsed();

    if common.verify {
        verify_solution(puzzle, status.solution())?;
    }

    if common.stats {
        let (allocated, resident) = memory_usage()?;
        print_stats(
            parse_time,
            elapsed,
            puzzle,
            creator.stats(),
            allocated,
            resident,
            &status,
        );
    }

    let solution = match &status {
        SolveStatus::Solved(solution) => solution,
        SolveStatus::Unsatisfiable => {
            println!("No solution.");
            return Ok(());
        }
        SolveStatus::TimedOut { elapsed } => {
            println!("No solution within {:.3}s.", elapsed.as_secs_f64());
            return Ok(());
        }
    };

    let rendered = Rendered::new(puzzle, solution);
    print!("{rendered}");

    if let Some(path) = output {
        std::fs::write(path, rendered.to_string())
            .map_err(|e| format!("Unable to write {}: {e}", path.display()))?;
        println!("Grid written to: {}", path.display());
    }

    Ok(())
}

/// Checks a fill against the puzzle.
///
/// Prints whether the verification was successful. Nothing is checked when there is no fill.
///
/// # Errors
///
/// If the fill is incomplete or breaks a constraint.
pub(crate) fn verify_solution(
    puzzle: &Crossword,
    sol: Option<&Assignment>,
) -> Result<(), String> {
    let Some(assignment) = sol else {
        return Ok(());
    };

    let ok = assignment.is_complete() && assignment.is_consistent(puzzle);
    println!("Verified: {ok:?}");
    if ok {
        Ok(())
    } else {
        Err("Solution failed verification!".to_string())
    }
}

/// Reads allocated and resident memory from jemalloc, in MiB.
fn memory_usage() -> Result<(f64, f64), String> {
    let read = || -> Result<(usize, usize), tikv_jemalloc_ctl::Error> {
        epoch::advance()?;
        Ok((stats::allocated::read()?, stats::resident::read()?))
    };
    let (allocated, resident) = read().map_err(|e| format!("jemalloc stats unavailable: {e}"))?;

    Ok((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and search statistics.
pub(crate) fn print_stats(
    parse_time: Duration,
    elapsed: Duration,
    puzzle: &Crossword,
    s: &SearchStats,
    allocated: f64,
    resident: f64,
    status: &SolveStatus,
) {
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Grid", format!("{}x{}", puzzle.height(), puzzle.width()));
    stat_line("Slots", puzzle.num_vars());
    stat_line("Crossings", puzzle.arcs().len() / 2);
    stat_line("Words", puzzle.num_words());

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Backtracks", s.backtracks, elapsed_secs);
    stat_line_with_rate("Revisions", s.revisions, elapsed_secs);
    stat_line_with_rate("Wipeouts", s.wipeouts, elapsed_secs);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");

    match status {
        SolveStatus::Solved(_) => println!("\nSOLVED"),
        SolveStatus::Unsatisfiable => println!("\nUNSATISFIABLE"),
        SolveStatus::TimedOut { elapsed } => {
            println!("\nTIMED OUT after {:.3}s", elapsed.as_secs_f64());
        }
    }
}
