//! Logging infrastructure: the [`Log`] seam used by commands, the
//! [`Logger`] facade, and the console subscriber installed by the binary.
//!
//! Engine modules emit plain `tracing` events under the `inikit::parser`,
//! `inikit::resolve` and `inikit::store` targets; commands report through a
//! [`Log`] so their output style stays in one place.

mod logger;
mod subscriber;
mod types;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::Log;

#[cfg(test)]
pub use types::MockLog;

/// Target of stage header events.
pub const STAGE_TARGET: &str = "inikit::stage";
