use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use super::CliResult;
use crate::Cli;

#[derive(Args)]
pub struct CompletionsArgs {
    /// Target shell
    shell: Shell,
}

pub fn run(args: CompletionsArgs) -> CliResult {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(args.shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
