//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

pub use cli::{Command, PressArgs, PressOptions};
pub use types::{PositiveU64, PositiveUsize};
