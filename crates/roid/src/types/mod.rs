pub mod bundle_output;

use std::sync::Arc;

use roid_common::NormalizedBundlerOptions;
use roid_resolver::Resolver;

pub type SharedResolver = Arc<Resolver>;
pub type SharedOptions = Arc<NormalizedBundlerOptions>;
