mod ecma_compiler;
mod module_rewriter;

pub use crate::ecma_compiler::{EcmaCompiler, TransformReturn};
