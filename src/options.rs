use clap::Parser;

use crate::backend::DEFAULT_STEP_LIMIT;

#[derive(Clone, Debug, Parser)]
#[clap(author, version, about)]
pub struct Options {
    /// Input files, executed in order in one session. Reads standard input when empty
    pub input: Vec<String>,

    /// Print the IR of every generated function to stderr
    #[clap(long = "dump-ir")]
    pub dump_ir: bool,

    /// Maximum level of the log messages shown
    #[clap(long = "log-level", default_value_t = String::from("warn"), possible_values(&["off", "error", "warn", "info", "debug", "trace"]))]
    pub log_level: String,

    /// Maximum number of instructions a single top-level expression may execute
    #[clap(long = "step-limit", default_value_t = DEFAULT_STEP_LIMIT)]
    pub step_limit: u64,

    /// Do not show the interactive prompt
    #[clap(short, long)]
    pub quiet: bool,
}

impl Options {
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Warn)
    }
}

/// Gets command line options using clap.
/// Returns an Options struct representing the fully parsed options
pub fn get() -> Options {
    Options::parse()
}
