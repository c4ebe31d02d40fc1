pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_SHORT: char = 'h';
pub(crate) const HELP_MESSAGE: &str = "Show this help message and exit.";

/// Exit status for a successful run, including `--help`.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status when the command line cannot be parsed.
pub const EXIT_USAGE: i32 = 2;
/// Exit status when the command line parser itself is mis-configured.
pub const EXIT_FAILURE: i32 = 1;
