use terminal_size::{terminal_size, Width};

use crate::model::{Arity, Declaration, Kind};
use crate::parser::UserInterface;

const INDENT: usize = 2;
// Descriptions start at this column, unless the flags reach past it.
const HELP_POSITION: usize = 24;
const MINIMUM_DESCRIPTION_WIDTH: usize = 20;
// Used when the output isn't a terminal (ex: it is piped into a file).
const DEFAULT_WIDTH: usize = 80;

/// Renders the usage line and the help message.
pub(crate) struct Printer {
    program: String,
    about: Option<String>,
    declarations: Vec<Declaration>,
    width: usize,
}

impl Printer {
    /// A printer sized to the attached terminal.
    pub(crate) fn terminal(
        program: impl Into<String>,
        about: Option<String>,
        declarations: Vec<Declaration>,
    ) -> Self {
        let width = match terminal_size() {
            Some((Width(columns), _)) => columns as usize,
            None => DEFAULT_WIDTH,
        };

        Self::new(program, about, declarations, width)
    }

    pub(crate) fn new(
        program: impl Into<String>,
        about: Option<String>,
        declarations: Vec<Declaration>,
        width: usize,
    ) -> Self {
        Self {
            program: program.into(),
            about,
            declarations,
            width,
        }
    }

    pub(crate) fn program(&self) -> &str {
        &self.program
    }

    /// The one line synopsis: options in the order declared, then the arguments in position order.
    pub(crate) fn usage(&self) -> String {
        let mut parts = vec![format!("usage: {}", self.program)];
        parts.extend(self.options().map(synopsis));
        parts.extend(self.arguments().map(metavar));
        parts.join(" ")
    }

    pub(crate) fn print_help(&self, user_interface: &(impl UserInterface + ?Sized)) {
        user_interface.print(self.usage());

        if let Some(about) = &self.about {
            user_interface.print(String::default());

            for line in wrap(about, self.width) {
                user_interface.print(line);
            }
        }

        let mut sections = vec![
            (
                "positional arguments:",
                self.arguments()
                    .map(|argument| self.row(&metavar(argument), argument.help.as_deref()))
                    .collect::<Vec<_>>(),
            ),
            (
                "options:",
                self.options()
                    .map(|option| self.row(&flags(option), option.help.as_deref()))
                    .collect::<Vec<_>>(),
            ),
        ];
        sections.retain(|(_, rows)| !rows.is_empty());

        for (title, rows) in sections {
            user_interface.print(String::default());
            user_interface.print(title.to_string());

            for line in rows.into_iter().flatten() {
                user_interface.print(line);
            }
        }
    }

    fn options(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations
            .iter()
            .filter(|declaration| matches!(declaration.kind, Kind::Option { .. }))
    }

    fn arguments(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations
            .iter()
            .filter(|declaration| declaration.kind == Kind::Argument)
    }

    fn row(&self, lead: &str, description: Option<&str>) -> Vec<String> {
        let description_width = std::cmp::max(
            self.width.saturating_sub(HELP_POSITION),
            MINIMUM_DESCRIPTION_WIDTH,
        );
        let lead = format!("{:width$}{lead}", "", width = INDENT);
        let mut descriptions = description
            .map(|description| wrap(description, description_width))
            .unwrap_or_default()
            .into_iter();
        let mut lines = Vec::default();

        match descriptions.next() {
            // At least two spaces must separate the lead from its description.
            Some(first) if lead.chars().count() + 2 <= HELP_POSITION => {
                lines.push(format!("{lead:width$}{first}", width = HELP_POSITION));
            }
            Some(first) => {
                lines.push(lead);
                lines.push(format!("{:width$}{first}", "", width = HELP_POSITION));
            }
            None => lines.push(lead),
        }

        lines.extend(descriptions.map(|line| format!("{:width$}{line}", "", width = HELP_POSITION)));
        lines
    }
}

// Ex: `{1, 2, 3}`, `echo`, `THREADS`
fn metavar(declaration: &Declaration) -> String {
    if !declaration.choices.is_empty() {
        format!("{{{}}}", declaration.choices.join(", "))
    } else if declaration.kind == Kind::Argument {
        declaration.name.clone()
    } else {
        declaration.name.to_ascii_uppercase().replace('-', "_")
    }
}

// Ex: `[-v]`, `[-p {1, 2, 3}]`, `[--dry-run]`
fn synopsis(option: &Declaration) -> String {
    let flag = match option.kind {
        Kind::Option { short: Some(s) } => format!("-{s}"),
        _ => format!("--{n}", n = option.name),
    };

    match option.arity {
        Arity::Flag => format!("[{flag}]"),
        Arity::Value => format!("[{flag} {m}]", m = metavar(option)),
    }
}

// Ex: `-v, --verbose`, `-p, --threads {1, 2, 3}`
fn flags(option: &Declaration) -> String {
    let long = match option.arity {
        Arity::Flag => format!("--{n}", n = option.name),
        Arity::Value => format!("--{n} {m}", n = option.name, m = metavar(option)),
    };

    match option.kind {
        Kind::Option { short: Some(s) } => format!("-{s}, {long}"),
        _ => long,
    }
}

/// Break the text into lines of at most `width` characters, at whitespace.
/// A word longer than `width` gets a line of its own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut line = String::default();

    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }

        if !line.is_empty() {
            line.push(' ');
        }

        line.push_str(word);
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

/// Points out where in the input tokens parsing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ErrorContext {
    // Counted over the tokens' bytes, without the spaces that join them.
    offset: usize,
    tokens: Vec<String>,
}

impl ErrorContext {
    pub(crate) fn new(offset: usize, tokens: &[&str]) -> Self {
        Self {
            offset,
            tokens: tokens.iter().map(|token| token.to_string()).collect(),
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut remaining = self.offset;
        let mut column = 0;

        for (i, token) in self.tokens.iter().enumerate() {
            let last = i + 1 == self.tokens.len();

            if remaining < token.len() || last {
                // Past the end of the final token, point at its last byte.
                column += std::cmp::min(remaining, token.len().saturating_sub(1));
                break;
            }

            remaining -= token.len();
            column += token.len() + 1;
        }

        write!(f, "{}\n{:column$}^", self.tokens.join(" "), "")
    }
}
