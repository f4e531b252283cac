pub mod classifier;
pub mod directory;
pub mod evaluator;
pub mod ledger;
pub mod pipeline;
pub mod renderer;
pub mod report;
pub mod resolver;
pub mod retry;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
