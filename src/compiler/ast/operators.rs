use strum_macros::{Display, EnumString};
use enum_assoc::Assoc;

/// Arithmetic operations usable in replacement arguments.
/// Parsed from their source token, rendered with the same token in C.
#[allow(non_camel_case_types)]
#[derive(Debug, Eq, PartialEq, Copy, Clone, Display, EnumString, Assoc)]
#[func(pub const fn token(&self) -> &'static str)]
pub enum ArithmeticOperation {
    #[strum(serialize = "+")]
    #[assoc(token = "+")]
    ADD,
    #[strum(serialize = "-")]
    #[assoc(token = "-")]
    SUB,
    #[strum(serialize = "*")]
    #[assoc(token = "*")]
    MUL,
    #[strum(serialize = "/")]
    #[assoc(token = "/")]
    DIV,
    #[strum(serialize = "%")]
    #[assoc(token = "%")]
    REM
}

/// Comparison and logical operations usable in `if` conditions.
#[allow(non_camel_case_types)]
#[derive(Debug, Eq, PartialEq, Copy, Clone, Display, EnumString, Assoc)]
#[func(pub const fn token(&self) -> &'static str)]
pub enum ConditionOperation {
    #[strum(serialize = "==")]
    #[assoc(token = "==")]
    EQ,
    #[strum(serialize = "!=")]
    #[assoc(token = "!=")]
    NEQ,
    #[strum(serialize = "&&")]
    #[assoc(token = "&&")]
    AND,
    #[strum(serialize = "||")]
    #[assoc(token = "||")]
    OR,
    #[strum(serialize = "<")]
    #[assoc(token = "<")]
    LT,
    #[strum(serialize = ">")]
    #[assoc(token = ">")]
    GT,
    #[strum(serialize = "<=")]
    #[assoc(token = "<=")]
    LE,
    #[strum(serialize = ">=")]
    #[assoc(token = ">=")]
    GE
}
