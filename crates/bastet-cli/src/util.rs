use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use bastet_chooser::{policy::SelectionPolicy, seed::ChooserSeed};
use bastet_engine::Well;
use rand::Rng as _;

/// Writes `value` as pretty JSON to `output_path`, or to stdout when `None`.
pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    match output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_json(BufWriter::new(file), value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))
        }
        None => write_json(io::stdout().lock(), value).context("Failed to write JSON to stdout"),
    }
}

fn write_json<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Reads a well drawn with `#` and `.`, bottom row last.
pub fn read_well_file<P>(path: P) -> anyhow::Result<Well>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let art = fs::read_to_string(path)
        .with_context(|| format!("Failed to open board file: {}", path.display()))?;
    Well::from_ascii(&art).with_context(|| format!("Failed to parse board file: {}", path.display()))
}

/// Options shared by every command that builds a chooser.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ChooserArg {
    /// Seed for the chooser, as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<ChooserSeed>,
    /// JSON file overriding the selection policy
    #[arg(long)]
    policy: Option<PathBuf>,
}

impl ChooserArg {
    pub fn seed(&self) -> ChooserSeed {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }

    pub fn policy(&self) -> anyhow::Result<SelectionPolicy> {
        match &self.policy {
            Some(path) => read_json_file("policy", path),
            None => Ok(SelectionPolicy::default()),
        }
    }
}
