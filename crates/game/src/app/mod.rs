mod bootstrap;
mod loop_runner;
mod script;

pub(crate) use bootstrap::{build_app, init_tracing, parse_args, usage_text, Command};
pub(crate) use loop_runner::run;
