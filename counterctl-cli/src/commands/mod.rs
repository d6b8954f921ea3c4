pub mod counter;
pub mod serve;

pub use counter::{run_counter, run_wipe, CounterOp};
pub use serve::run_serve;
