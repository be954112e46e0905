mod loader_hook;

pub use crate::loader_hook::{LoaderHook, SharedLoaderHook};
