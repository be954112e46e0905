mod bundler_options;
mod module_loader;
mod types;

pub use bundler_options::{
  normalized_bundler_options::NormalizedBundlerOptions, platform::Platform,
  resolve_options::ResolveOptions, BundlerOptions,
};

pub use crate::{
  module_loader::{task_result::NormalModuleTaskResult, ModuleLoaderMsg},
  types::{
    asset::Asset, module_id::ModuleId, output_asset::OutputAsset, raw_idx::ModuleIdx,
    resolved_id::ResolvedId, source::Source, source_joiner::SourceJoiner,
  },
};
