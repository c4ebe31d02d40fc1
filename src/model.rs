use crate::constant::*;

/// How many values a parameter consumes each time it is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Arity {
    /// No value; the parameter's presence is what counts (ex: `-v`).
    Flag,
    /// Exactly one value (ex: `-p 4`, or a positional argument).
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    /// Specified by position.
    Argument,
    /// Specified via `--name`, or `-s` when there is a short name.
    Option { short: Option<char> },
}

/// Everything the parser knows about a parameter, independent of the program variable it writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Declaration {
    pub(crate) name: String,
    pub(crate) kind: Kind,
    pub(crate) arity: Arity,
    pub(crate) help: Option<String>,
    pub(crate) choices: Vec<String>,
}

impl Declaration {
    /// The implicit `-h/--help` switch, present in every parser.
    pub(crate) fn help() -> Self {
        Self {
            name: HELP_NAME.to_string(),
            kind: Kind::Option {
                short: Some(HELP_SHORT),
            },
            arity: Arity::Flag,
            help: Some(HELP_MESSAGE.to_string()),
            choices: Vec::default(),
        }
    }

    /// How the parameter is referred to in error messages (ex: `-p/--threads`, `echo`).
    pub(crate) fn label(&self) -> String {
        match self.kind {
            Kind::Argument => self.name.clone(),
            Kind::Option { short: Some(s) } => format!("-{s}/--{n}", n = self.name),
            Kind::Option { short: None } => format!("--{n}", n = self.name),
        }
    }
}

/// The name of type `T` with its module paths stripped (ex: `alloc::string::String` becomes `String`).
pub(crate) fn type_label<T: ?Sized>() -> String {
    let mut label = String::default();
    let mut segment = String::default();

    for c in std::any::type_name::<T>().chars() {
        match c {
            ':' => segment.clear(),
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' => {
                label.push_str(&segment);
                segment.clear();
                label.push(c);
            }
            _ => segment.push(c),
        }
    }

    label.push_str(&segment);
    label
}

pub(crate) fn type_label_of<T: ?Sized>(_value: &T) -> String {
    type_label::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn declaration(kind: Kind) -> Declaration {
        Declaration {
            name: "threads".to_string(),
            kind,
            arity: Arity::Value,
            help: None,
            choices: Vec::default(),
        }
    }

    #[rstest]
    #[case(Kind::Argument, "threads")]
    #[case(Kind::Option { short: None }, "--threads")]
    #[case(Kind::Option { short: Some('p') }, "-p/--threads")]
    fn label(#[case] kind: Kind, #[case] expected: &str) {
        assert_eq!(declaration(kind).label(), expected);
    }

    #[test]
    fn help() {
        let help = Declaration::help();
        assert_eq!(help.label(), "-h/--help");
        assert_eq!(help.arity, Arity::Flag);
    }

    #[test]
    fn type_label_primitive() {
        assert_eq!(type_label::<i64>(), "i64");
        assert_eq!(type_label::<u8>(), "u8");
        assert_eq!(type_label::<bool>(), "bool");
        assert_eq!(type_label::<str>(), "str");
    }

    #[test]
    fn type_label_pathed() {
        assert_eq!(type_label::<String>(), "String");
        assert_eq!(type_label::<Vec<String>>(), "Vec<String>");
        assert_eq!(type_label::<Option<Vec<u32>>>(), "Option<Vec<u32>>");
        assert_eq!(type_label::<&[String]>(), "&[String]");
    }

    #[test]
    fn type_label_value() {
        let echo = "hello".to_string();
        let number: i64 = 5;
        assert_eq!(type_label_of(&echo), "String");
        assert_eq!(type_label_of(&number), "i64");
    }
}
