//! Delimited data files that feed per-request substitutions.
mod table;


pub use table::{DataTable, INDEX_FIELD, Row};
