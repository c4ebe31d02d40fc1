use std::rc::Rc;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::constant::{EXIT_SUCCESS, EXIT_USAGE};
use crate::parser::{Action, ErrorContext, Parser, Printer, UserInterface};

/// A parser ready to run, along with what it needs to report back.
/// Built via `CommandLineParser::build`.
pub(crate) struct GeneralParser<'a> {
    parser: Parser<'a>,
    printer: Printer,
    user_interface: Rc<dyn UserInterface>,
}

impl<'a> GeneralParser<'a> {
    pub(crate) fn new(
        parser: Parser<'a>,
        printer: Printer,
        user_interface: Rc<dyn UserInterface>,
    ) -> Self {
        Self {
            parser,
            printer,
            user_interface,
        }
    }

    /// Match the tokens, then convert them into the program variables.
    /// No variable is written unless every token matched.
    ///
    /// `Err(0)` means help was shown (`-h` or `--help`, ahead of any bad token), and nothing was converted.
    /// `Err(2)` means the usage and a complaint went to the error output.
    pub(crate) fn parse_tokens(self, tokens: &[&str]) -> Result<(), i32> {
        let GeneralParser {
            parser,
            printer,
            user_interface,
        } = self;

        match parser.consume(tokens) {
            Ok(Action::Continue) => Ok(()),
            Ok(Action::PrintHelp) => {
                printer.print_help(&*user_interface);
                Err(EXIT_SUCCESS)
            }
            Err((offset, parse_error)) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Parse error at offset {offset}: {parse_error:?}.");
                }

                user_interface.print_error(printer.usage());
                user_interface.print_error(format!(
                    "{p}: error: {parse_error}",
                    p = printer.program()
                ));
                user_interface.print_error_context(ErrorContext::new(offset, tokens));
                Err(EXIT_USAGE)
            }
        }
    }
}
