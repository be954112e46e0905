// An wrapper around the `oxc_resolver` crate to provide a more roid-specific API.

mod resolver;

pub use crate::resolver::{ResolveReturn, Resolver};

pub use roid_common::ResolveOptions;
