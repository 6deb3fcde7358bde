mod app;
mod config;
mod data;
mod descriptor;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use data::DataError;
pub use descriptor::DescriptorError;
pub use validation::ValidationError;
