use std::fmt::Display;
use std::rc::Rc;
use std::str::FromStr;

use crate::api::Parameter;
use crate::model::Declaration;
use crate::parser::{Capturable, ConfigError, GeneralParser, Parser, Printer, UserInterface};

/// Declares the command line, one parameter at a time.
pub(crate) struct CommandLineParser<'a> {
    program: String,
    about: Option<String>,
    parameters: Vec<(Declaration, Box<dyn Capturable + 'a>)>,
}

impl<'a> CommandLineParser<'a> {
    pub(crate) fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            about: None,
            parameters: Vec::default(),
        }
    }

    /// Describe the program in the help message.
    /// If repeated, only the final description applies.
    pub(crate) fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Arguments are matched positionally in the order they are added.
    /// Options are documented in the order they are added.
    pub(crate) fn add<T>(mut self, parameter: Parameter<'a, T>) -> Self
    where
        T: 'a + FromStr + PartialEq + Display,
    {
        let (declaration, capture) = parameter.split();
        self.parameters.push((declaration, Box::new(capture)));
        self
    }

    /// Finalize the configuration, checking for mistakes (ex: a repeated parameter name).
    pub(crate) fn build(
        self,
        user_interface: Rc<dyn UserInterface>,
    ) -> Result<GeneralParser<'a>, ConfigError> {
        let CommandLineParser {
            program,
            about,
            parameters,
        } = self;
        let mut declarations = vec![Declaration::help()];
        declarations.extend(parameters.iter().map(|(declaration, _)| declaration.clone()));
        let parser = Parser::new(&declarations, parameters)?;
        let printer = Printer::terminal(program, about, declarations);
        Ok(GeneralParser::new(parser, printer, user_interface))
    }
}
