use std::collections::HashMap;
use thiserror::Error;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::api::InvalidValue;
use crate::constant::*;
use crate::matcher::{MatchError, TokenMatcher, TokenMatcherError};
use crate::model::Declaration;

/// A mistake in how the command line was declared (ex: two parameters sharing a name).
#[derive(Debug, Error)]
#[error("Config error: {0}")]
pub(crate) struct ConfigError(pub(crate) String);

impl From<TokenMatcherError> for ConfigError {
    fn from(error: TokenMatcherError) -> Self {
        ConfigError(error.to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ParseError {
    #[error(transparent)]
    Usage(#[from] MatchError),

    #[error("argument {label}: {error}")]
    Value { label: String, error: InvalidValue },
}

/// Converts and stores the raw value of one parameter, whatever its type.
///
/// We use this at the middle of the object graph, so parameters of different types share one parser.
pub(crate) trait Capturable {
    /// The parameter appeared on the command line.
    fn matched(&mut self);

    /// Convert and store a raw value for the parameter.
    fn capture(&mut self, token: &str) -> Result<(), InvalidValue>;
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Continue,
    PrintHelp,
}

struct Target<'a> {
    label: String,
    capture: Box<dyn Capturable + 'a>,
}

pub(crate) struct Parser<'a> {
    token_matcher: TokenMatcher,
    targets: HashMap<String, Target<'a>>,
}

impl<'a> Parser<'a> {
    /// The `declarations` must include the help switch; the `parameters` don't.
    pub(crate) fn new(
        declarations: &[Declaration],
        parameters: Vec<(Declaration, Box<dyn Capturable + 'a>)>,
    ) -> Result<Self, ConfigError> {
        let token_matcher = TokenMatcher::new(declarations)?;
        let targets = parameters
            .into_iter()
            .map(|(declaration, capture)| {
                let target = Target {
                    label: declaration.label(),
                    capture,
                };
                (declaration.name, target)
            })
            .collect();

        Ok(Self {
            token_matcher,
            targets,
        })
    }

    /// Match every token, then (unless help was asked for) convert the values into the program variables.
    /// Errors carry the byte offset of the offending token.
    pub(crate) fn consume(self, tokens: &[&str]) -> Result<Action, (usize, ParseError)> {
        let Parser {
            mut token_matcher,
            mut targets,
        } = self;
        let mut failure = None;

        for token in tokens {
            if let Err(error) = token_matcher.feed(token) {
                failure.replace((token_matcher.offset(), error));
                break;
            }
        }

        // Help wins over anything that went wrong after it.
        if token_matcher.contains(HELP_NAME) {
            return Ok(Action::PrintHelp);
        }

        if let Some((offset, error)) = failure {
            return Err((offset, ParseError::from(error)));
        }

        let offset = token_matcher.offset();
        let matches = token_matcher
            .close()
            .map_err(|error| (offset, ParseError::from(error)))?;

        for matched in matches {
            let target = targets
                .get_mut(&matched.name)
                .expect("internal error - every match has a target");
            target.capture.matched();

            if let Some((offset, value)) = matched.value {
                target.capture.capture(&value).map_err(|error| {
                    let label = target.label.clone();
                    (offset, ParseError::Value { label, error })
                })?;

                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Captured '{value}' for {}.", target.label);
                }
            }
        }

        Ok(Action::Continue)
    }
}
