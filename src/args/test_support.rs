use clap::Parser;

use crate::error::{AppError, AppResult};

use super::PressArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<PressArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    PressArgs::try_parse_from(args).map_err(AppError::from)
}
