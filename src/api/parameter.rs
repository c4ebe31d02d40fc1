use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

use crate::api::{CliArgument, CliOption, Field};
use crate::model::{type_label, Declaration, Kind};
use crate::parser::Capturable;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum InvalidValue {
    #[error("invalid {type_name} value: '{token}'")]
    Conversion { token: String, type_name: String },

    #[error("invalid choice: '{token}' (choose from {choices})")]
    Choice { token: String, choices: String },
}

/// Converts raw tokens into `T`, checks them against the choices, and hands them to the field.
pub(crate) struct Capture<'a, T> {
    field: Box<dyn Field<T> + 'a>,
    choices: Option<Vec<T>>,
}

impl<'a, T> Capturable for Capture<'a, T>
where
    T: FromStr + PartialEq + Display,
{
    fn matched(&mut self) {
        self.field.matched();
    }

    fn capture(&mut self, token: &str) -> Result<(), InvalidValue> {
        let converted = T::from_str(token);

        match (converted, &self.choices) {
            (Ok(value), Some(choices)) if !choices.contains(&value) => {
                Err(invalid_choice(token, choices))
            }
            // A choice restricted parameter only reports the choices, even when the token won't convert.
            (Err(_), Some(choices)) => Err(invalid_choice(token, choices)),
            (Err(_), None) => Err(InvalidValue::Conversion {
                token: token.to_string(),
                type_name: type_label::<T>(),
            }),
            (Ok(value), _) => {
                self.field.capture(value);
                Ok(())
            }
        }
    }
}

fn invalid_choice<T: Display>(token: &str, choices: &[T]) -> InvalidValue {
    InvalidValue::Choice {
        token: token.to_string(),
        choices: join_choices(choices),
    }
}

// Ex: `1, 2, 3`
fn join_choices<T: Display>(choices: &[T]) -> String {
    choices
        .iter()
        .map(|choice| choice.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

/// An argument or option, bound to the program variable it writes into.
pub(crate) struct Parameter<'a, T> {
    declaration: Declaration,
    capture: Capture<'a, T>,
}

impl<'a, T> Parameter<'a, T> {
    fn bind(field: impl Field<T> + 'a, name: impl Into<String>, kind: Kind) -> Self {
        Self {
            declaration: Declaration {
                name: name.into(),
                kind,
                arity: field.arity(),
                help: None,
                choices: Vec::default(),
            },
            capture: Capture {
                field: Box::new(field),
                choices: None,
            },
        }
    }

    pub(crate) fn option(
        field: impl Field<T> + CliOption + 'a,
        name: impl Into<String>,
        short: Option<char>,
    ) -> Self {
        Self::bind(field, name, Kind::Option { short })
    }

    pub(crate) fn argument(field: impl Field<T> + CliArgument + 'a, name: impl Into<String>) -> Self {
        Self::bind(field, name, Kind::Argument)
    }

    /// Describe the parameter in the help message.
    /// If repeated, only the final message applies.
    pub(crate) fn help(mut self, description: impl Into<String>) -> Self {
        self.declaration.help = Some(description.into());
        self
    }

    pub(crate) fn split(self) -> (Declaration, Capture<'a, T>) {
        (self.declaration, self.capture)
    }
}

impl<'a, T: Display> Parameter<'a, T> {
    /// Restrict the values the parameter accepts.
    /// If repeated, only the final set applies.
    ///
    /// The initial value of the program variable is not checked against the choices.
    pub(crate) fn choices(mut self, variants: impl IntoIterator<Item = T>) -> Self {
        let variants: Vec<T> = variants.into_iter().collect();
        self.declaration.choices = variants.iter().map(|v| v.to_string()).collect();
        self.capture.choices = Some(variants);
        self
    }
}
