mod cli;
mod prompt;
mod util;

pub(crate) use cli::as_cli;
pub(crate) use prompt::as_prompt;
