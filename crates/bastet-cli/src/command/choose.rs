use std::path::PathBuf;

use bastet_chooser::{
    chooser::{BastetBlockChooser, NoPreviewBlockChooser},
    evaluator::Evaluation,
    policy::Decision,
    seed::ChooserSeed,
};
use bastet_engine::{BlockKind, BlockQueue, Well};
use serde::Serialize;

use crate::util::{self, ChooserArg};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ChooseArg {
    /// Board file: rows of `#` and `.`, bottom row last
    #[arg(long)]
    board: PathBuf,
    /// Block the player drops next (the previewed block)
    #[arg(long, conflicts_with = "no_preview")]
    current: Option<BlockKind>,
    /// Choose as in a game without a preview
    #[arg(long)]
    no_preview: bool,
    #[command(flatten)]
    chooser: ChooserArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ChooseReport {
    seed: ChooserSeed,
    queue: BlockQueue,
    evaluation: Evaluation,
    decision: Decision,
}

pub(crate) fn run(arg: &ChooseArg) -> anyhow::Result<()> {
    let ChooseArg {
        board,
        current,
        no_preview,
        chooser,
        output,
    } = arg;

    let well: Well = util::read_well_file(board)?;
    let seed = chooser.seed();
    let policy = chooser.policy()?;
    let queue = current.map_or_else(BlockQueue::new, BlockQueue::one);

    log::info!("Choosing with seed {seed}");
    let decision = if *no_preview {
        NoPreviewBlockChooser::with_seed(seed)
            .with_policy(policy)
            .decide(&well)
    } else {
        BastetBlockChooser::with_seed(seed)
            .with_policy(policy)
            .decide(&well, &queue)
    };
    log::info!("Chose {}", decision.chosen());

    let report = ChooseReport {
        seed,
        queue,
        evaluation: Evaluation::new(&well, 0),
        decision,
    };
    util::save_json(&report, output.as_deref())
}
