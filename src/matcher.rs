use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::model::{Arity, Declaration, Kind};

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum TokenMatcherError {
    #[error("Cannot duplicate the parameter '{0}'.")]
    DuplicateName(String),

    #[error("Cannot duplicate the short option '-{0}'.")]
    DuplicateShort(char),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum MatchError {
    #[error("Missing the argument '{0}'.")]
    MissingArgument(String),

    #[error("Option '--{0}' expects a value.")]
    MissingValue(String),

    #[error("Option '--{0}' does not take a value.")]
    UnexpectedValue(String),

    #[error("Unrecognized argument '{0}', no more arguments to match against.")]
    Unrecognized(String),

    #[error("Option '--{0}' does not exist.")]
    UnknownOption(String),

    #[error("Short option '-{0}' does not exist.")]
    UnknownShortOption(char),
}

/// One occurrence of a parameter on the command line.
/// The value (if any) is paired with its byte offset into the concatenated tokens.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Matched {
    pub(crate) name: String,
    pub(crate) value: Option<(usize, String)>,
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'t> {
    EndOfOptions,
    Long(&'t str, Option<&'t str>),
    Short(&'t str, Option<&'t str>),
    Value(&'t str),
}

/// Aligns the raw tokens to parameters, without interpreting any values.
#[derive(Debug)]
pub(crate) struct TokenMatcher {
    options: HashMap<String, Arity>,
    shorts: HashMap<char, String>,
    arguments: VecDeque<String>,
    // Tokens such as `-1` are values, unless a short option could be spelt that way.
    negative_values: bool,
    // Set by `--`.
    positional_only: bool,
    offset: usize,
    // An option still waiting on its value (ex: after `-p`).
    pending: Option<String>,
    matches: Vec<Matched>,
}

impl TokenMatcher {
    pub(crate) fn new(declarations: &[Declaration]) -> Result<Self, TokenMatcherError> {
        let mut names = HashSet::new();
        let mut options = HashMap::default();
        let mut shorts = HashMap::default();
        let mut arguments = VecDeque::default();

        for declaration in declarations {
            if !names.insert(declaration.name.as_str()) {
                return Err(TokenMatcherError::DuplicateName(declaration.name.clone()));
            }

            match declaration.kind {
                Kind::Argument => arguments.push_back(declaration.name.clone()),
                Kind::Option { short } => {
                    options.insert(declaration.name.clone(), declaration.arity);

                    if let Some(short) = short {
                        if shorts.insert(short, declaration.name.clone()).is_some() {
                            return Err(TokenMatcherError::DuplicateShort(short));
                        }
                    }
                }
            }
        }

        let negative_values = !shorts.keys().any(char::is_ascii_digit);

        Ok(Self {
            options,
            shorts,
            arguments,
            negative_values,
            positional_only: false,
            offset: 0,
            pending: None,
            matches: Vec::default(),
        })
    }

    /// The byte offset where the next token starts.
    /// After a failed `feed`, this is where the failing token starts.
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.matches.iter().any(|matched| matched.name == name)
    }

    pub(crate) fn feed(&mut self, token: &str) -> Result<(), MatchError> {
        let result = match (self.pending.take(), self.classify(token)) {
            (Some(name), Token::Value(value)) => {
                self.push(name, Some((self.offset, value.to_string())));
                Ok(())
            }
            (Some(name), _) => Err(MatchError::MissingValue(name)),
            (None, Token::EndOfOptions) => {
                self.positional_only = true;
                Ok(())
            }
            (None, Token::Long(name, value)) => self.match_long(name, value),
            (None, Token::Short(cluster, value)) => self.match_short(cluster, value),
            (None, Token::Value(value)) => self.match_argument(value),
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Fed token '{token}' at offset {}: {result:?}.", self.offset);
        }

        if result.is_ok() {
            self.offset += token.len();
        }

        result
    }

    pub(crate) fn close(mut self) -> Result<Vec<Matched>, MatchError> {
        if let Some(name) = self.pending {
            return Err(MatchError::MissingValue(name));
        }

        if let Some(name) = self.arguments.pop_front() {
            return Err(MatchError::MissingArgument(name));
        }

        Ok(self.matches)
    }

    fn classify<'t>(&self, token: &'t str) -> Token<'t> {
        if self.positional_only {
            Token::Value(token)
        } else if token == "--" {
            Token::EndOfOptions
        } else if let Some(long) = token.strip_prefix("--") {
            let (name, value) = split_equals(long);
            Token::Long(name, value)
        } else if let Some(cluster) = token.strip_prefix('-') {
            if cluster.is_empty() || (self.negative_values && is_negative_number(token)) {
                Token::Value(token)
            } else {
                let (cluster, value) = split_equals(cluster);
                Token::Short(cluster, value)
            }
        } else {
            Token::Value(token)
        }
    }

    fn push(&mut self, name: String, value: Option<(usize, String)>) {
        self.matches.push(Matched { name, value });
    }

    // --threads, --threads=4
    fn match_long(&mut self, name: &str, value: Option<&str>) -> Result<(), MatchError> {
        match (self.options.get(name).copied(), value) {
            (None, _) => return Err(MatchError::UnknownOption(name.to_string())),
            (Some(Arity::Flag), None) => self.push(name.to_string(), None),
            (Some(Arity::Flag), Some(_)) => {
                return Err(MatchError::UnexpectedValue(name.to_string()))
            }
            (Some(Arity::Value), Some(value)) => {
                // The 3 comes from the option specifier '--' and the delimiter '='.
                let offset = self.offset + name.len() + 3;
                self.push(name.to_string(), Some((offset, value.to_string())));
            }
            (Some(Arity::Value), None) => self.pending = Some(name.to_string()),
        };

        Ok(())
    }

    // -v, -p 4, -p4, -p=4, -vp 4, -vp4
    fn match_short(&mut self, cluster: &str, value: Option<&str>) -> Result<(), MatchError> {
        for (index, short) in cluster.char_indices() {
            let name = match self.shorts.get(&short) {
                Some(name) => name.clone(),
                None => return Err(MatchError::UnknownShortOption(short)),
            };
            let arity = *self
                .options
                .get(&name)
                .expect("internal error - every short option names an option");
            let rest_index = index + short.len_utf8();
            let rest = &cluster[rest_index..];

            match arity {
                Arity::Flag if rest.is_empty() && value.is_some() => {
                    return Err(MatchError::UnexpectedValue(name));
                }
                Arity::Flag => self.push(name, None),
                Arity::Value if !rest.is_empty() => {
                    // The remainder of the token is the value.
                    let attached = match value {
                        Some(value) => format!("{rest}={value}"),
                        None => rest.to_string(),
                    };
                    // The 1 comes from the short option specifier '-'.
                    let offset = self.offset + rest_index + 1;
                    self.push(name, Some((offset, attached)));
                    return Ok(());
                }
                Arity::Value => match value {
                    Some(value) => {
                        // The 2 comes from the short option specifier '-' and the delimiter '='.
                        let offset = self.offset + cluster.len() + 2;
                        self.push(name, Some((offset, value.to_string())));
                    }
                    None => self.pending = Some(name),
                },
            }
        }

        Ok(())
    }

    fn match_argument(&mut self, value: &str) -> Result<(), MatchError> {
        match self.arguments.pop_front() {
            Some(name) => {
                self.push(name, Some((self.offset, value.to_string())));
                Ok(())
            }
            None => Err(MatchError::Unrecognized(value.to_string())),
        }
    }
}

fn split_equals(token: &str) -> (&str, Option<&str>) {
    match token.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (token, None),
    }
}

// Ex: `-1`, `-10`, `-1.5`, `-.5`
fn is_negative_number(token: &str) -> bool {
    let Some(number) = token.strip_prefix('-') else {
        return false;
    };
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());

    match number.split_once('.') {
        Some((whole, fraction)) => digits(whole) && !fraction.is_empty() && digits(fraction),
        None => !number.is_empty() && digits(number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn option(name: &str, short: Option<char>, arity: Arity) -> Declaration {
        Declaration {
            name: name.to_string(),
            kind: Kind::Option { short },
            arity,
            help: None,
            choices: Vec::default(),
        }
    }

    fn argument(name: &str) -> Declaration {
        Declaration {
            name: name.to_string(),
            kind: Kind::Argument,
            arity: Arity::Value,
            help: None,
            choices: Vec::default(),
        }
    }

    // The declarations of `parse_arg` itself.
    fn parse_arg() -> TokenMatcher {
        TokenMatcher::new(&[
            Declaration::help(),
            argument("echo"),
            argument("number"),
            option("verbose", Some('v'), Arity::Flag),
            option("threads", Some('p'), Arity::Value),
        ])
        .unwrap()
    }

    fn matched(name: &str, value: Option<(usize, &str)>) -> Matched {
        Matched {
            name: name.to_string(),
            value: value.map(|(offset, v)| (offset, v.to_string())),
        }
    }

    fn feed_all(tm: &mut TokenMatcher, tokens: &[&str]) -> Result<(), (usize, MatchError)> {
        for token in tokens {
            tm.feed(token).map_err(|error| (tm.offset(), error))?;
        }

        Ok(())
    }

    #[rstest]
    #[case(vec![option("a", None, Arity::Flag), option("a", Some('a'), Arity::Value)], TokenMatcherError::DuplicateName("a".to_string()))]
    #[case(vec![argument("a"), option("a", None, Arity::Flag)], TokenMatcherError::DuplicateName("a".to_string()))]
    #[case(vec![argument("a"), argument("a")], TokenMatcherError::DuplicateName("a".to_string()))]
    #[case(vec![option("a", Some('x'), Arity::Flag), option("b", Some('x'), Arity::Flag)], TokenMatcherError::DuplicateShort('x'))]
    #[case(vec![Declaration::help(), option("hat", Some('h'), Arity::Flag)], TokenMatcherError::DuplicateShort('h'))]
    fn new_duplicate(#[case] declarations: Vec<Declaration>, #[case] expected: TokenMatcherError) {
        assert_eq!(TokenMatcher::new(&declarations).unwrap_err(), expected);
    }

    #[rstest]
    #[case(vec!["hi", "3"], vec![matched("echo", Some((0, "hi"))), matched("number", Some((2, "3")))])]
    #[case(vec!["-v", "hi", "3"], vec![matched("verbose", None), matched("echo", Some((2, "hi"))), matched("number", Some((4, "3")))])]
    #[case(vec!["hi", "--verbose", "3"], vec![matched("echo", Some((0, "hi"))), matched("verbose", None), matched("number", Some((11, "3")))])]
    #[case(vec!["hi", "3", "-p", "4"], vec![matched("echo", Some((0, "hi"))), matched("number", Some((2, "3"))), matched("threads", Some((5, "4")))])]
    #[case(vec!["--threads", "4", "hi", "3"], vec![matched("threads", Some((9, "4"))), matched("echo", Some((10, "hi"))), matched("number", Some((12, "3")))])]
    fn feed(#[case] tokens: Vec<&str>, #[case] expected: Vec<Matched>) {
        let mut tm = parse_arg();

        feed_all(&mut tm, &tokens).unwrap();

        assert_eq!(tm.close().unwrap(), expected);
    }

    #[rstest]
    #[case(vec!["--threads=4"], 10, "4")]
    #[case(vec!["--threads="], 10, "")]
    #[case(vec!["--threads=a b"], 10, "a b")]
    #[case(vec!["-p", "4"], 2, "4")]
    #[case(vec!["-p4"], 2, "4")]
    #[case(vec!["-p10"], 2, "10")]
    #[case(vec!["-p=4"], 3, "4")]
    #[case(vec!["-p4=5"], 2, "4=5")]
    #[case(vec!["-vp4"], 3, "4")]
    #[case(vec!["-vp", "4"], 3, "4")]
    #[case(vec!["-vp=4"], 4, "4")]
    #[case(vec!["-p", "-1"], 2, "-1")]
    #[case(vec!["--threads", "-2.5"], 9, "-2.5")]
    fn feed_option_value(#[case] tokens: Vec<&str>, #[case] offset: usize, #[case] expected: &str) {
        let mut tm = parse_arg();

        feed_all(&mut tm, &tokens).unwrap();

        assert!(tm.contains("threads"));
        feed_all(&mut tm, &["hi", "3"]).unwrap();
        let matches = tm.close().unwrap();
        assert!(matches.contains(&matched("threads", Some((offset, expected)))));
    }

    #[rstest]
    #[case(vec!["-v"], 1)]
    #[case(vec!["-v", "-v"], 2)]
    #[case(vec!["-vv"], 2)]
    #[case(vec!["--verbose", "-v"], 2)]
    #[case(vec!["-vvv", "--verbose"], 4)]
    fn feed_repeat_flag(#[case] tokens: Vec<&str>, #[case] expected: usize) {
        let mut tm = parse_arg();

        feed_all(&mut tm, &tokens).unwrap();
        feed_all(&mut tm, &["hi", "3"]).unwrap();

        let matches = tm.close().unwrap();
        assert_eq!(
            matches.iter().filter(|m| m.name == "verbose").count(),
            expected
        );
    }

    #[test]
    fn feed_repeat_value() {
        let mut tm = parse_arg();

        feed_all(&mut tm, &["-p", "4", "hi", "--threads", "5", "3"]).unwrap();

        assert_eq!(
            tm.close().unwrap(),
            vec![
                matched("threads", Some((2, "4"))),
                matched("echo", Some((3, "hi"))),
                matched("threads", Some((14, "5"))),
                matched("number", Some((15, "3"))),
            ]
        );
    }

    #[rstest]
    #[case(vec!["-42", "-1.5"], "-42", "-1.5")]
    #[case(vec!["-", "-.5"], "-", "-.5")]
    #[case(vec!["--", "-v", "--threads"], "-v", "--threads")]
    #[case(vec!["--", "--", "3"], "--", "3")]
    #[case(vec!["hi", "--", "-3"], "hi", "-3")]
    fn feed_dashed_values(#[case] tokens: Vec<&str>, #[case] echo: &str, #[case] number: &str) {
        let mut tm = parse_arg();

        feed_all(&mut tm, &tokens).unwrap();

        let values: Vec<String> = tm
            .close()
            .unwrap()
            .into_iter()
            .filter_map(|m| m.value.map(|(_, v)| v))
            .collect();
        assert_eq!(values, vec![echo.to_string(), number.to_string()]);
    }

    #[test]
    fn feed_digit_short() {
        let mut tm = TokenMatcher::new(&[
            option("one", Some('1'), Arity::Flag),
            argument("item"),
        ])
        .unwrap();

        tm.feed("-1").unwrap();

        assert!(tm.contains("one"));
        assert_eq!(
            tm.feed("-2").unwrap_err(),
            MatchError::UnknownShortOption('2')
        );
    }

    #[rstest]
    #[case(vec!["hi", "3", "extra"], 3, MatchError::Unrecognized("extra".to_string()))]
    #[case(vec!["hi", "3", "--bogus"], 3, MatchError::UnknownOption("bogus".to_string()))]
    #[case(vec!["hi", "3", "--verbose=yes"], 3, MatchError::UnexpectedValue("verbose".to_string()))]
    #[case(vec!["hi", "3", "-v=yes"], 3, MatchError::UnexpectedValue("verbose".to_string()))]
    #[case(vec!["hi", "-x"], 2, MatchError::UnknownShortOption('x'))]
    #[case(vec!["hi", "-vx"], 2, MatchError::UnknownShortOption('x'))]
    #[case(vec!["-p", "-v"], 2, MatchError::MissingValue("threads".to_string()))]
    #[case(vec!["--threads", "--verbose"], 9, MatchError::MissingValue("threads".to_string()))]
    #[case(vec!["-p", "--"], 2, MatchError::MissingValue("threads".to_string()))]
    fn feed_error(
        #[case] tokens: Vec<&str>,
        #[case] expected_offset: usize,
        #[case] expected: MatchError,
    ) {
        let mut tm = parse_arg();

        let (offset, error) = feed_all(&mut tm, &tokens).unwrap_err();

        assert_eq!(offset, expected_offset);
        assert_eq!(error, expected);
    }

    #[rstest]
    #[case(vec![], MatchError::MissingArgument("echo".to_string()))]
    #[case(vec!["hi"], MatchError::MissingArgument("number".to_string()))]
    #[case(vec!["-v", "hi"], MatchError::MissingArgument("number".to_string()))]
    #[case(vec!["hi", "3", "-p"], MatchError::MissingValue("threads".to_string()))]
    fn close_error(#[case] tokens: Vec<&str>, #[case] expected: MatchError) {
        let mut tm = parse_arg();

        feed_all(&mut tm, &tokens).unwrap();

        assert_eq!(tm.close().unwrap_err(), expected);
    }

    #[test]
    fn contains_before_error() {
        let mut tm = parse_arg();

        tm.feed("-h").unwrap();
        assert_matches!(tm.feed("--bogus"), Err(MatchError::UnknownOption(_)));

        assert!(tm.contains("help"));
        assert!(!tm.contains("verbose"));
    }

    #[rstest]
    #[case("-1", true)]
    #[case("-123", true)]
    #[case("-1.5", true)]
    #[case("-.5", true)]
    #[case("-", false)]
    #[case("-.", false)]
    #[case("-1.", false)]
    #[case("-1x", false)]
    #[case("-v", false)]
    #[case("1", false)]
    #[case("--1", false)]
    fn negative_number(#[case] token: &str, #[case] expected: bool) {
        assert_eq!(is_negative_number(token), expected);
    }
}
