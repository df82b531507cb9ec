use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use mochex::{
    automaton::{nfa_dot, AutomatonError, Nfa},
    ltl::{self, Formula},
    regex::{self, Expression},
};
use std::{fs, path::PathBuf, process::ExitCode};
use tabled::{Table, Tabled};

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Automaton(#[from] AutomatonError),
    #[error("invalid regular expression: {0}")]
    Regex(#[from] regex::ParseError),
    #[error("invalid formula: {0}")]
    Ltl(#[from] ltl::ParseError),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Table,
    Dot,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// build the automaton of the regular expression <EXPRESSION>
    #[command(arg_required_else_help = true)]
    Regex {
        /// Expression such as ((a.b)+c)* or (a.(b)*)
        expression: String,
        /// Remove unreachable and dead states from the result
        #[arg(long)]
        prune: bool,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Remove the useless parts of the automaton stored in <FILE>
    Prune {
        /// JSON encoded automaton
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Check whether two automata are equal up to renaming of states.
    /// Return 0 if they are or 1 if they are not.
    Equiv {
        left: PathBuf,
        right: PathBuf,
    },
    /// print the normalized form of the LTL formula <FORMULA>
    Ltl { formula: String },
}

#[derive(Debug, Parser)]
#[command(name = "mochex")]
#[command(about = "A command line tool to build, trim and compare finite automata")]
#[command(author, version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Tabled)]
struct TransitionRow {
    from: String,
    letter: String,
    to: String,
}

fn transition_table(nfa: &Nfa) -> Table {
    let mut rows = Vec::new();
    for from in nfa.states() {
        for (letter, targets) in nfa.edges(from) {
            rows.push(TransitionRow {
                from: from.to_string(),
                letter: letter.to_string(),
                to: targets.to_string(),
            });
        }
    }
    Table::new(rows)
}

fn render(nfa: &Nfa, format: Format) -> Result<String, CliError> {
    Ok(match format {
        Format::Json => nfa.to_json()?,
        Format::Dot => nfa_dot(nfa),
        Format::Table => format!(
            "initial states: {}\nfinal states: {}\n{}",
            nfa.initial_states(),
            nfa.final_states(),
            transition_table(nfa)
        ),
    })
}

fn read_nfa(path: PathBuf) -> Result<Nfa, CliError> {
    let json = fs::read_to_string(&path).map_err(|source| CliError::Io { path, source })?;
    Ok(Nfa::from_json(&json)?)
}

fn run(command: Commands) -> Result<bool, CliError> {
    match command {
        Commands::Regex {
            expression,
            prune,
            format,
        } => {
            let expression: Expression = expression.parse()?;
            info!("building automaton for {}", expression);
            let mut nfa = expression.to_nfa()?;
            if prune {
                nfa = nfa.remove_useless_parts();
            }
            println!("{}", render(&nfa, format)?);
        }
        Commands::Prune { file, format } => {
            let nfa = read_nfa(file)?.remove_useless_parts();
            println!("{}", render(&nfa, format)?);
        }
        Commands::Equiv { left, right } => {
            let equivalent = read_nfa(left)?.is_equivalent(&read_nfa(right)?);
            println!("{}", if equivalent { "equivalent" } else { "not equivalent" });
            return Ok(equivalent);
        }
        Commands::Ltl { formula } => {
            let formula: Formula = formula.parse()?;
            println!("{}", formula);
        }
    }
    Ok(true)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Cli::parse();

    match run(args.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(2)
        }
    }
}
