use clap::{Parser, Subcommand};

use self::{choose::ChooseArg, sample_queue::SampleQueueArg, simulate::SimulateArg};

mod choose;
mod sample_queue;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Choose the next block for a board read from a file
    Choose(#[clap(flatten)] ChooseArg),
    /// Play a greedy player against a chooser and report statistics
    Simulate(#[clap(flatten)] SimulateArg),
    /// Print starting queues
    SampleQueue(#[clap(flatten)] SampleQueueArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Choose(arg) => choose::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::SampleQueue(arg) => sample_queue::run(&arg)?,
    }
    Ok(())
}
