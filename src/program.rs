use std::rc::Rc;

use crate::api::{CommandLineParser, Parameter, Scalar, Switch};
use crate::constant::*;
use crate::model::type_label_of;
use crate::parser::{ConsoleInterface, UserInterface};

const PROGRAM: &str = "parse_arg";
const ABOUT: &str =
    "Echo a string and an integer back along with their types, optionally in verbose mode with a chosen number of threads.";
const DEFAULT_THREADS: u8 = 2;

/// The command line of `parse_arg`, once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArguments {
    /// The string to display.
    pub echo: String,
    /// The number to display.
    pub number: i64,
    /// Whether `-v/--verbose` was given.
    pub verbose: bool,
    /// The number of threads, from 1 to 8.
    pub threads: u8,
}

impl Default for ParsedArguments {
    fn default() -> Self {
        Self {
            echo: String::default(),
            number: 0,
            verbose: false,
            threads: DEFAULT_THREADS,
        }
    }
}

impl ParsedArguments {
    pub(crate) fn parse_tokens(
        tokens: &[&str],
        user_interface: Rc<dyn UserInterface>,
    ) -> Result<Self, i32> {
        let mut parsed = ParsedArguments::default();

        {
            // The parser borrows the fields of `parsed` until it is consumed.
            let parser = CommandLineParser::new(PROGRAM)
                .about(ABOUT)
                .add(
                    Parameter::argument(Scalar::new(&mut parsed.echo), "echo")
                        .help("display a string"),
                )
                .add(
                    Parameter::argument(Scalar::new(&mut parsed.number), "number")
                        .help("display a number"),
                )
                .add(
                    Parameter::option(Switch::new(&mut parsed.verbose), "verbose", Some('v'))
                        .help("verbose mode"),
                )
                .add(
                    Parameter::option(Scalar::new(&mut parsed.threads), "threads", Some('p'))
                        .help(format!("number of threads (default: {DEFAULT_THREADS})"))
                        .choices(1..=8),
                )
                .build(user_interface.clone());

            let parser = match parser {
                Ok(parser) => parser,
                Err(error) => {
                    user_interface.print_error(error.to_string());
                    return Err(EXIT_FAILURE);
                }
            };

            parser.parse_tokens(tokens)?;
        }

        Ok(parsed)
    }

    /// The lines `parse_arg` reports for these arguments.
    ///
    /// ### Example
    /// ```
    /// use parse_arg::ParsedArguments;
    ///
    /// let parsed = ParsedArguments {
    ///     echo: "hi".to_string(),
    ///     number: 3,
    ///     verbose: false,
    ///     threads: 2,
    /// };
    /// assert_eq!(
    ///     parsed.report(),
    ///     vec!["Using 2 threads", "hi's type is String", "3's type is i64"]
    /// );
    /// ```
    pub fn report(&self) -> Vec<String> {
        let mut lines = Vec::default();

        if self.verbose {
            lines.push("Verbose mode".to_string());
        }

        lines.push(format!("Using {} threads", self.threads));
        lines.push(format!(
            "{}'s type is {}",
            self.echo,
            type_label_of(&self.echo)
        ));
        lines.push(format!(
            "{}'s type is {}",
            self.number,
            type_label_of(&self.number)
        ));
        lines
    }
}

pub(crate) fn run_with_interface(tokens: &[&str], user_interface: Rc<dyn UserInterface>) -> i32 {
    match ParsedArguments::parse_tokens(tokens, user_interface.clone()) {
        Ok(parsed) => {
            for line in parsed.report() {
                user_interface.print(line);
            }

            EXIT_SUCCESS
        }
        Err(exit_code) => exit_code,
    }
}

/// Run `parse_arg` against the tokens (excluding the program name), writing to stdout/stderr.
/// Returns the process exit status.
///
/// ### Example
/// ```
/// assert_eq!(parse_arg::run(&["hi", "3"]), 0);
/// assert_eq!(parse_arg::run(&["hi", "3", "-p", "9"]), 2);
/// ```
pub fn run(tokens: &[&str]) -> i32 {
    run_with_interface(tokens, Rc::new(ConsoleInterface::default()))
}
