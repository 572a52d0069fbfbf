pub mod fetch;
pub mod print;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch your games from an online chess platform into a position graph
    Fetch(fetch::FetchArgs),
    /// Print a persisted position graph
    Print(print::PrintArgs),
}

pub async fn run(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Fetch(args) => fetch::run(args).await,
        Command::Print(args) => print::run(&args),
    }
}
