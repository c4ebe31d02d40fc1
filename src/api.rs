mod core;
mod field;
mod parameter;

pub(crate) use self::core::*;
pub(crate) use self::field::*;
pub(crate) use self::parameter::*;
