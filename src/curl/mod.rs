//! Curl command lines as request descriptors.
//!
//! The engine only sees the [`DescriptorBuilder`] seam; [`CurlBuilder`] is
//! the implementation used by the CLI.
mod builder;
mod files;
mod lexer;
mod options;
mod source;


use reqwest::{Client, Request};

use crate::error::AppResult;

pub use builder::CurlBuilder;
pub use files::BodyFiles;
pub use lexer::split_words;
pub use options::CurlCommand;
pub use source::resolve_descriptor;

/// Turns an expanded descriptor into a ready-to-send request.
pub trait DescriptorBuilder: Send + Sync {
    /// Builds one outgoing request.
    ///
    /// # Errors
    ///
    /// Returns an error when the descriptor cannot be parsed or the request
    /// cannot be assembled.
    fn build(&self, client: &Client, descriptor: &str) -> AppResult<Request>;
}
