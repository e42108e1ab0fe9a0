//! # crossword-csp
//!
//! Fills a crossword grid from a word list by treating every slot as a variable of a
//! constraint-satisfaction problem: node consistency and AC-3 prune the candidate words, then
//! a backtracking search with MRV/degree and least-constraining-value heuristics completes
//! the fill.
//!
//! ## Usage
//!
//! ```sh
//! crossword-csp <STRUCTURE> <WORDS> [OUTPUT] [OPTIONS]
//! crossword-csp completions <SHELL>
//! ```
//!
//! -   `STRUCTURE`: a structure file (`_` for open cells, anything else blocked), or a
//!     directory; every `.txt` file below it is solved with the same word list.
//! -   `WORDS`: one word per line.
//! -   `OUTPUT`: optional file receiving the filled grid.
//!
//! ### Options
//!
//! -   `-d, --debug`: debug logging (`RUST_LOG` overrides the level).
//! -   `--verify <BOOL>`: check the fill before printing it (default: `true`).
//! -   `--stats <BOOL>`: print problem and search statistics (default: `true`).
//! -   `--variable-selection <mrv-degree|fixed-order>` (default: `mrv-degree`).
//! -   `--value-ordering <least-constraining|dictionary>` (default: `least-constraining`).
//! -   `--worklist <fifo|lifo>`: AC-3 worklist discipline (default: `fifo`).
//! -   `--no-inference`: skip arc consistency after each decision.
//! -   `--time-limit <SECS>`: stop searching after this many seconds.
//!
//! ## Example Invocations
//!
//! ```sh
//! crossword-csp data/structure0.txt data/words0.txt
//! crossword-csp data/structure1.txt data/words1.txt out.txt --value-ordering dictionary
//! crossword-csp data/ data/words1.txt --stats false
//! ```

use crate::command_line::cli::{Cli, Commands, solve_dir, solve_file};
use crate::command_line::logger::init_logger;
use clap::{CommandFactory, Parser};
use std::process::ExitCode;

mod command_line;

/// Global allocator using `tikv-jemallocator`, which also backs the memory statistics.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Delegates to [`try_main`], printing any error to stderr and exiting with a failure code.
fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("Error: {e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<(), String> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    init_logger(cli.common.debug);

    let (Some(structure), Some(words)) = (cli.structure, cli.words) else {
        return Err("Usage: crossword-csp <STRUCTURE> <WORDS> [OUTPUT]".to_string());
    };

    if structure.is_dir() {
        if cli.output.is_some() {
            return Err("OUTPUT cannot be used when STRUCTURE is a directory".to_string());
        }
        return solve_dir(&structure, &words, &cli.common);
    }

    solve_file(&structure, &words, cli.output.as_deref(), &cli.common)
}
