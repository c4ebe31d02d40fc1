use crate::parser::ErrorContext;

/// Where the parser sends its output.
pub(crate) trait UserInterface {
    /// Print a line of regular output (ex: the help message).
    fn print(&self, message: String);
    /// Print a line of error output.
    fn print_error(&self, message: String);
    fn print_error_context(&self, error_context: ErrorContext);
}

/// Regular output on stdout, errors on stderr.
#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, message: String) {
        eprintln!("{message}");
    }

    fn print_error_context(&self, error_context: ErrorContext) {
        eprintln!("{error_context}");
    }
}
