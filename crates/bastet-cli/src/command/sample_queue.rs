use std::{collections::BTreeMap, path::PathBuf};

use bastet_chooser::{
    chooser::{BastetBlockChooser, BlockChooser as _, NoPreviewBlockChooser},
    seed::ChooserSeed,
};
use bastet_engine::{BlockKind, BlockQueue};
use serde::Serialize;

use crate::util::{self, ChooserArg};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SampleQueueArg {
    /// Number of starting queues to draw
    #[arg(long, default_value_t = 20)]
    count: usize,
    /// Draw the single-block queues of a game without a preview
    #[arg(long)]
    no_preview: bool,
    #[command(flatten)]
    chooser: ChooserArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SampleQueueReport {
    seed: ChooserSeed,
    first_counts: BTreeMap<BlockKind, usize>,
    queues: Vec<BlockQueue>,
}

pub(crate) fn run(arg: &SampleQueueArg) -> anyhow::Result<()> {
    let seed = arg.chooser.seed();
    // Each queue opens a fresh game, all drawn from one generator.
    let queues: Vec<_> = if arg.no_preview {
        let mut chooser = NoPreviewBlockChooser::with_seed(seed);
        (0..arg.count).map(|_| chooser.starting_queue()).collect()
    } else {
        let mut chooser = BastetBlockChooser::with_seed(seed);
        (0..arg.count).map(|_| chooser.starting_queue()).collect()
    };

    let first_counts = count_first_blocks(&queues);
    log::info!("Drew {} queues, first blocks: {first_counts:?}", queues.len());

    let report = SampleQueueReport {
        seed,
        first_counts,
        queues,
    };
    util::save_json(&report, arg.output.as_deref())
}

fn count_first_blocks(queues: &[BlockQueue]) -> BTreeMap<BlockKind, usize> {
    let mut counts = BTreeMap::new();
    for kind in queues.iter().filter_map(BlockQueue::front) {
        *counts.entry(kind).or_insert(0) += 1;
    }
    counts
}
