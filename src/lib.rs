//! `parse_arg` echoes a string and an integer back, along with their types.
//!
//! ```console
//! $ parse_arg hi 3 -v -p 4
//! Verbose mode
//! Using 4 threads
//! hi's type is String
//! 3's type is i64
//! ```
//!
//! Arguments are required and specified positionally.
//! Options are optional and specified via `--..` or `-..` syntax.
//! Tokens are first matched to parameters, and only then converted into the program variables.
//! Any failure prints the usage and a specific complaint to stderr, with exit status `2`.
#![deny(missing_docs)]
mod api;
mod constant;
mod matcher;
mod model;
mod parser;
mod program;

pub use constant::{EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE};
pub use program::{run, ParsedArguments};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
