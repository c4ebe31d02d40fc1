mod base;
mod interface;
mod middleware;
mod printer;

pub(crate) use self::base::*;
pub(crate) use self::interface::*;
pub(crate) use self::middleware::*;
pub(crate) use self::printer::*;
