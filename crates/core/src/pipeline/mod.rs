pub mod compiler;

pub use compiler::{CompilerOptions, RecommendationCompiler};
