use crate::model::Arity;

/// Marker trait for fields that can back an option.
pub(crate) trait CliOption {}

/// Marker trait for fields that can back a positional argument.
pub(crate) trait CliArgument {}

/// Writes already converted values of type `T` into a program variable.
///
/// This is the bottom of the parser object graph, where each field still knows its type.
pub(crate) trait Field<T> {
    /// The parameter appeared on the command line.
    fn matched(&mut self);

    /// A value for the parameter, already converted and checked.
    fn capture(&mut self, value: T);

    fn arity(&self) -> Arity;
}

/// A field taking a single value.
/// When repeated, the last value wins.
pub(crate) struct Scalar<'a, T> {
    variable: &'a mut T,
}

impl<'a, T> CliOption for Scalar<'a, T> {}
impl<'a, T> CliArgument for Scalar<'a, T> {}

impl<'a, T> Scalar<'a, T> {
    pub(crate) fn new(variable: &'a mut T) -> Self {
        Self { variable }
    }
}

impl<'a, T> Field<T> for Scalar<'a, T> {
    fn matched(&mut self) {}

    fn capture(&mut self, value: T) {
        *self.variable = value;
    }

    fn arity(&self) -> Arity {
        Arity::Value
    }
}

/// An option field taking no value, which turns its variable on.
/// Matching it again changes nothing.
pub(crate) struct Switch<'a> {
    variable: &'a mut bool,
}

impl<'a> CliOption for Switch<'a> {}

impl<'a> Switch<'a> {
    pub(crate) fn new(variable: &'a mut bool) -> Self {
        Self { variable }
    }
}

impl<'a> Field<bool> for Switch<'a> {
    fn matched(&mut self) {
        *self.variable = true;
    }

    fn capture(&mut self, _value: bool) {
        unreachable!("internal error - a switch never receives a value");
    }

    fn arity(&self) -> Arity {
        Arity::Flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar() {
        let mut variable: i64 = 0;
        let mut scalar = Scalar::new(&mut variable);
        assert_eq!(scalar.arity(), Arity::Value);

        scalar.matched();
        scalar.capture(5);
        scalar.capture(-3);

        assert_eq!(variable, -3);
    }

    #[test]
    fn switch() {
        let mut variable = false;
        let mut switch = Switch::new(&mut variable);
        assert_eq!(switch.arity(), Arity::Flag);

        switch.matched();
        switch.matched();

        assert!(variable);
    }
}
