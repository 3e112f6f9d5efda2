use std::path::PathBuf;

use bastet_chooser::{
    chooser::{BastetBlockChooser, BlockChooser, NoPreviewBlockChooser, RandomBlockChooser},
    seed::ChooserSeed,
};
use bastet_engine::{GameStats, Well};
use serde::Serialize;

use crate::{
    player::play_greedy,
    util::{self, ChooserArg},
};

const PROGRESS_INTERVAL: usize = 100;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Maximum number of blocks to drop
    #[arg(long, default_value_t = 500)]
    turns: usize,
    /// Deal blocks as in a game without a preview
    #[arg(long, conflicts_with = "random")]
    no_preview: bool,
    /// Deal uniformly random blocks instead
    #[arg(long)]
    random: bool,
    #[command(flatten)]
    chooser: ChooserArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulateReport {
    seed: ChooserSeed,
    chooser: &'static str,
    game_over: bool,
    stats: GameStats,
    final_well: Vec<String>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        turns,
        no_preview,
        random,
        chooser,
        output,
    } = arg;

    let seed = chooser.seed();
    let policy = chooser.policy()?;
    let (name, mut chooser): (_, Box<dyn BlockChooser>) = if *random {
        ("random", Box::new(RandomBlockChooser::with_seed(seed)))
    } else if *no_preview {
        (
            "no-preview",
            Box::new(NoPreviewBlockChooser::with_seed(seed).with_policy(policy)),
        )
    } else {
        (
            "bastet",
            Box::new(BastetBlockChooser::with_seed(seed).with_policy(policy)),
        )
    };

    log::info!("Simulating up to {turns} turns against the {name} chooser (seed {seed})");
    let mut well = Well::EMPTY;
    let (stats, game_over) = play(chooser.as_mut(), &mut well, *turns);
    log::info!(
        "Finished after {} blocks, {} lines",
        stats.completed_blocks(),
        stats.total_cleared_lines()
    );

    let report = SimulateReport {
        seed,
        chooser: name,
        game_over,
        stats,
        final_well: well.to_string().lines().map(str::to_owned).collect(),
    };
    util::save_json(&report, output.as_deref())
}

/// Runs the pop / drop / push loop. Returns the stats and whether the game was lost.
fn play(chooser: &mut dyn BlockChooser, well: &mut Well, turns: usize) -> (GameStats, bool) {
    let mut stats = GameStats::new();
    let mut queue = chooser.starting_queue();

    for turn in 1..=turns {
        let Some(current) = queue.pop_front() else {
            break;
        };
        let Some(cleared) = play_greedy(well, current) else {
            log::info!("Game over at turn {turn}");
            return (stats, true);
        };
        stats.complete_block_drop(current, cleared);

        let next = chooser.next_block(well, &queue);
        if queue.push_back(next).is_err() {
            log::warn!("Queue full, dropping {next}");
        }

        if turn % PROGRESS_INTERVAL == 0 {
            log::info!(
                "Turn {turn}: {} lines, stack height {}",
                stats.total_cleared_lines(),
                well.stack_height()
            );
        }
    }
    (stats, false)
}
