// Reporters: the runner's `Reporter` trait implemented three ways. Each
// reporter accumulates into its own `state::TestResults` as documents run,
// and exposes an inherent `finish()` the command layer calls once every
// document has been processed.

pub mod console;
pub mod json;
pub mod junit;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use junit::JunitReporter;
