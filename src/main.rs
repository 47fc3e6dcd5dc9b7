use std::fs;
use std::path::{Path, PathBuf};

use arithmetic::{check_input, Config, InputState, Interpreter, Value};
use clap::Parser;
use log::info;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as ReplResult};

#[cfg(feature = "with-file-history")]
const HISTORY_FILE: &str = "history.txt";

/// A small imperative language: integer arithmetic, variables, comparisons,
/// `if`/`else`, bounded `while` loops and functions.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to run one statement at a time. Starts the REPL when omitted.
    script: Option<PathBuf>,

    /// Iterations after which a `while` loop is reported as infinite.
    #[arg(long, env = "ARITHMETIC_MAX_ITERATIONS", default_value_t = Config::default().max_iterations)]
    max_iterations: usize,

    /// Deepest allowed nesting of function calls.
    #[arg(long, env = "ARITHMETIC_MAX_CALL_DEPTH", default_value_t = Config::default().max_call_depth)]
    max_call_depth: usize,

    /// Deepest allowed nesting of brackets and statements in one input.
    #[arg(long, env = "ARITHMETIC_MAX_NESTING", default_value_t = Config::default().max_nesting)]
    max_nesting: usize,
}

fn main() -> Result<(), String> {
    env_logger::init();
    let args = Args::parse();
    let config = Config {
        max_iterations: args.max_iterations,
        max_call_depth: args.max_call_depth,
        max_nesting: args.max_nesting,
    };
    info!("Starting session with {:?}", config);
    let mut interpreter = Interpreter::new(config);
    match args.script {
        Some(path) => run_script(&mut interpreter, &path),
        None => run_repl(&mut interpreter).map_err(|err| err.to_string()),
    }
}

fn print_value(value: &Value) {
    if !value.is_unit() {
        println!("Result: {value}");
    }
}

fn is_exit(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

fn read_script(filename: &Path) -> Result<String, String> {
    fs::read_to_string(filename).map_err(|err| format!("{}: {err}", filename.display()))
}

/// Runs every statement of a file in one session, stopping at the first error.
/// A statement may span several lines as long as a bracket is still open.
fn run_script(interpreter: &mut Interpreter, filename: &Path) -> Result<(), String> {
    let source = read_script(filename)?;
    let mut pending = String::new();
    for line in source.lines() {
        pending.push_str(line);
        pending.push('\n');
        match check_input(&pending) {
            InputState::Empty => pending.clear(),
            InputState::ContinuationNeeded => continue,
            InputState::Complete => {
                let value = interpreter
                    .run(&std::mem::take(&mut pending))
                    .map_err(|err| err.to_string())?;
                print_value(&value);
            }
        }
    }
    if !pending.is_empty() {
        // Unclosed bracket at end of file; let the parser report it.
        interpreter
            .run(&pending)
            .map_err(|err| err.to_string())?;
    }
    Ok(())
}

fn run_repl(interpreter: &mut Interpreter) -> ReplResult<()> {
    let mut rl = DefaultEditor::new()?;
    #[cfg(feature = "with-file-history")]
    if rl.load_history(HISTORY_FILE).is_err() {
        info!("No previous history.");
    }
    println!("Type 'exit' or 'quit' to leave.");
    let mut pending = String::new();
    loop {
        let prompt = if pending.is_empty() { ">> " } else { ".. " };
        match rl.readline(prompt) {
            Ok(line) => {
                if pending.is_empty() && is_exit(&line) {
                    break;
                }
                rl.add_history_entry(line.as_str())?;
                pending.push_str(&line);
                pending.push('\n');
                match check_input(&pending) {
                    InputState::Empty => pending.clear(),
                    InputState::ContinuationNeeded => continue,
                    InputState::Complete => match interpreter.run(&std::mem::take(&mut pending)) {
                        Ok(value) => print_value(&value),
                        Err(err) => println!("Error: {err}"),
                    },
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    #[cfg(feature = "with-file-history")]
    rl.save_history(HISTORY_FILE)?;
    Ok(())
}
