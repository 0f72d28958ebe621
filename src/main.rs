use std::process::ExitCode;

use colored::Colorize;
use enumgen::cli;

fn main() -> ExitCode {
    let command_line_interface = cli::CommandLineInterface::load();
    enumgen::logging::init_tracing(command_line_interface.verbosity());
    match command_line_interface.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
