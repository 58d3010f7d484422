//! Brazilian federative unit (UF) codes.
//!
//! The 26 states plus the Federal District, by two-letter abbreviation.

use strum_macros::{AsRefStr, Display, EnumString};

/// A Brazilian state or the Federal District, by two-letter abbreviation.
///
/// Parsing is case-insensitive (`"sp".parse::<Uf>()` yields [`Uf::SP`]).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
#[allow(clippy::upper_case_acronyms)]
pub enum Uf {
    AC,
    AL,
    AP,
    AM,
    BA,
    CE,
    DF,
    ES,
    GO,
    MA,
    MT,
    MS,
    MG,
    PA,
    PB,
    PR,
    PE,
    PI,
    RJ,
    RN,
    RS,
    RO,
    RR,
    SC,
    SP,
    SE,
    TO,
}
