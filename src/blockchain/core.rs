// core.rs splits chain responsibilities into submodules: block construction
// and hashing, link validation, and the chain itself.
pub mod block;
pub mod chain;
pub mod validation;

pub use block::*;
pub use chain::*;
pub use validation::*;
