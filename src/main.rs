use colored::Colorize;
use std::process;

fn main() {
    if let Err(e) = brisk::cli::run() {
        if e.is_interrupted() {
            eprintln!("{} {}", "Interrupted:".yellow().bold(), e);
        } else {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        process::exit(e.exit_code());
    }
}
