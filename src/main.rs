//! Command line front end for the packing solver.
//!
//! # Usage
//!
//! Count the regions of a puzzle file that can be packed:
//!
//! ```sh
//! polypack solve puzzle.txt
//! ```
//!
//! Show a packing for every feasible region, solving four regions at once and
//! giving up on any region after a million search nodes:
//!
//! ```sh
//! polypack solve puzzle.txt --display --color --jobs 4 --node-limit 1000000
//! ```
//!
//! Write a random puzzle that is known to be solvable:
//!
//! ```sh
//! polypack generate --width 10 --height 8 --shapes 7 --seed 42
//! ```
//!
//! Set `RUST_LOG=info` (or `debug`) to follow the progress of the solver.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process,
};

use clap::{Parser, Subcommand, ValueEnum};
use polyomino_packing::{
    batch::verdict_name,
    generate::{generate_seeded, GenerateError, GeneratorOptions},
    solve_puzzle, BatchOptions, ParseError, Puzzle, SearchLimits, SolveError, SolveOptions,
    Symmetry, UnknownPolicy, Verdict,
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
enum CliError {
    #[display("failed to read {}: {source}", path.display())]
    #[from(ignore)]
    Read { path: PathBuf, source: io::Error },
    #[display("failed to write {}: {source}", path.display())]
    #[from(ignore)]
    Write { path: PathBuf, source: io::Error },
    #[display("{}: {source}", path.display())]
    #[from(ignore)]
    Parse { path: PathBuf, source: ParseError },
    #[display("{_0}")]
    Solve(SolveError),
    #[display("{_0}")]
    Generate(GenerateError),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SymmetryArg {
    /// Rotations and reflections.
    Full,
    /// Rotations only.
    Rotations,
    /// Shapes are placed as drawn.
    Fixed,
}

impl From<SymmetryArg> for Symmetry {
    fn from(arg: SymmetryArg) -> Self {
        match arg {
            SymmetryArg::Full => Symmetry::Full,
            SymmetryArg::Rotations => Symmetry::Rotations,
            SymmetryArg::Fixed => Symmetry::Fixed,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decide which regions of a puzzle file can be packed.
    Solve {
        /// Puzzle file to read.
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Give up on a region after this many search nodes.
        #[arg(long, value_name = "COUNT")]
        node_limit: Option<u64>,

        /// Number of regions to solve at once, 0 for one per core.
        #[arg(short, long, value_name = "COUNT", default_value_t = 1)]
        jobs: usize,

        /// Transformations allowed when placing shapes.
        #[arg(long, value_name = "KIND", default_value = "full")]
        symmetry: SymmetryArg,

        /// Print the packing found for every feasible region.
        #[arg(short, long)]
        display: bool,

        /// Draw packings with ANSI colours.
        #[arg(long, requires = "display")]
        color: bool,

        /// Fail instead of counting undecided regions as not feasible.
        #[arg(long)]
        strict: bool,
    },
    /// Write a random puzzle that is known to have a packing.
    Generate {
        /// Width of the region.
        #[arg(long, value_name = "CELLS", default_value_t = 8)]
        width: usize,

        /// Height of the region.
        #[arg(long, value_name = "CELLS", default_value_t = 8)]
        height: usize,

        /// Number of shapes to cut the region into.
        #[arg(long, value_name = "COUNT", default_value_t = 6)]
        shapes: usize,

        /// Seed for reproducible output. Chosen at random if missing.
        #[arg(long)]
        seed: Option<u64>,

        /// File to write instead of standard output.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    let result = match args.command {
        Command::Solve {
            input,
            node_limit,
            jobs,
            symmetry,
            display,
            color,
            strict,
        } => {
            let options = BatchOptions {
                solve: SolveOptions {
                    limits: SearchLimits {
                        max_nodes: node_limit,
                    },
                },
                symmetry: symmetry.into(),
                jobs,
            };
            let policy = if strict {
                UnknownPolicy::Reject
            } else {
                UnknownPolicy::CountAsInfeasible
            };
            solve(&input, &options, policy, display, color)
        }
        Command::Generate {
            width,
            height,
            shapes,
            seed,
            output,
        } => generate(
            &GeneratorOptions {
                width,
                height,
                shapes,
            },
            seed,
            output.as_deref(),
        ),
    };

    if let Err(err) = result {
        eprintln!("{err}");
        process::exit(1);
    }
}

fn solve(
    input: &Path,
    options: &BatchOptions,
    policy: UnknownPolicy,
    display: bool,
    color: bool,
) -> Result<(), CliError> {
    let text = fs::read_to_string(input).map_err(|source| CliError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let puzzle = Puzzle::parse(&text).map_err(|source| CliError::Parse {
        path: input.to_path_buf(),
        source,
    })?;
    let report = solve_puzzle(&puzzle, options)?;

    let total = report.regions().len();
    for (idx, region) in report.regions().iter().enumerate() {
        println!("Region {}/{}: {}", idx + 1, total, verdict_name(&region.verdict));

        if let (true, Verdict::Feasible(arrangement)) = (display, &region.verdict) {
            if color {
                println!("{}", arrangement.ansi());
            } else {
                println!("{arrangement}");
            }
            println!();
        }
    }

    let tally = report.tally();
    if tally.unknown > 0 && policy == UnknownPolicy::CountAsInfeasible {
        log::warn!(
            "[{}] region(s) hit the node limit and are counted as not feasible.",
            tally.unknown
        );
    }

    let count = report.count_feasible(policy)?;
    println!("{count}");

    Ok(())
}

fn generate(
    options: &GeneratorOptions,
    seed: Option<u64>,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let seed = seed.unwrap_or_else(rand::random);
    log::info!("Generating puzzle with seed [{}].", seed);

    let puzzle = generate_seeded(options, seed)?;

    match output {
        Some(path) => fs::write(path, puzzle.to_string()).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            print!("{puzzle}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_their_cause() {
        let parse = Puzzle::parse("0:\n#\n\n1x1: 1 2\n").unwrap_err();
        let err = CliError::Parse {
            path: PathBuf::from("puzzle.txt"),
            source: parse,
        };
        assert!(err.to_string().starts_with("puzzle.txt: "));

        let err = CliError::from(GenerateError::NoShapes);
        assert_eq!(err.to_string(), "at least one shape must be requested");

        let err = CliError::Read {
            path: PathBuf::from("missing.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "failed to read missing.txt: not found");
    }
}
