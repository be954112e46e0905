use std::path::PathBuf;

use clap::Args;

use crate::types::platform::Platform;

#[derive(Args)]
pub struct InputArgs {
  /// Entry module, resolved against `--cwd`.
  pub input: Option<String>,

  #[clap(long)]
  pub cwd: Option<PathBuf>,

  #[clap(long, short)]
  pub platform: Option<Platform>,
}

#[derive(Args)]
pub struct OutputArgs {
  /// Where to write the bundle, relative to `--cwd`.
  #[clap(long, short = 'o')]
  pub file: Option<String>,
}

#[derive(Args)]
pub struct LogArgs {
  /// Only print errors.
  #[clap(long, short)]
  pub silent: bool,

  /// Log every module as it is parsed. `RUST_LOG` takes precedence.
  #[clap(long, short, conflicts_with = "silent")]
  pub verbose: bool,
}
