//! Command implementations for the odin CLI
//!
//! `run` is the task entrypoint: it reads the task input, fans every
//! registered check out over every target and writes NDJSON findings plus an
//! error stream. `list` prints the registry, and `test` runs one check
//! against one hand-specified target for local debugging.

pub mod list;
pub mod run;
