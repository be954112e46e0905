use clap::ValueEnum;

#[derive(PartialEq, Eq, Clone, Copy, ValueEnum)]
#[clap(rename_all = "lower")]
pub enum Platform {
  Node,
  Browser,
  Neutral,
}

impl From<Platform> for roid::Platform {
  fn from(value: Platform) -> Self {
    match value {
      Platform::Node => roid::Platform::Node,
      Platform::Browser => roid::Platform::Browser,
      Platform::Neutral => roid::Platform::Neutral,
    }
  }
}
