use std::path::PathBuf;

use thiserror::Error;

pub type Span = logos::Span;

/// Netlist parse errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected end of input at {at:?}")]
    UnexpectedEof { at: Span },
    #[error("Expected {expected}, found {found} at {at:?}")]
    UnexpectedToken {
        expected: String,
        found: String,
        at: Span,
    },
    #[error("Unknown token {found} at {at:?}")]
    UnknownToken { found: String, at: Span },
    #[error("SExpr {0} not found")]
    MissingChild(String),
    #[error("Value of {0} not found")]
    MissingValue(String),
    #[error("Invalid timestamp {0}")]
    InvalidTimestamp(String),
    #[error("Invalid net code {0}")]
    InvalidNetCode(String),
    #[error("Expected an export netlist, found ({0} ...)")]
    UnexpectedRoot(String),
}

/// Errors in a `start:stop[:step]` range
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid character '{ch}' in letter-count string \"{value}\"")]
    InvalidLetter { ch: char, value: String },
    #[error("invalid range bound \"{0}\"")]
    InvalidNumber(String),
    #[error("invalid range step \"{0}\"")]
    InvalidStep(String),
    #[error("step must be a positive integer, got {0}")]
    NonPositiveStep(i64),
    #[error("range bounds \"{start}\" and \"{stop}\" use different numeral systems")]
    MixedNumerals { start: String, stop: String },
}

/// Errors while expanding a single plural name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    #[error("bad range in name {name}: {source}")]
    Range {
        name: String,
        #[source]
        source: RangeError,
    },
    #[error("mismatched braces {opener} {closer} in name {name}")]
    BraceMismatch {
        opener: char,
        closer: char,
        name: String,
    },
    #[error("unmatched brace {closer} in name {name}")]
    UnmatchedCloser { closer: char, name: String },
    #[error("unrecognized operator {op} in name {name}")]
    UnknownOperator { op: String, name: String },
    #[error("${index} refers past the {groups} group(s) in name {name}")]
    UnknownGroup {
        index: usize,
        groups: usize,
        name: String,
    },
}

/// Errors found while replicating the records of a netlist
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplicateError {
    #[error("malformed component reference {reference}: {source}")]
    Component {
        reference: String,
        #[source]
        source: ExpandError,
    },
    #[error("malformed pin in libpart {lib}/{part}: {source}")]
    Pin {
        lib: String,
        part: String,
        #[source]
        source: ExpandError,
    },
    #[error("mismatched pin nums and names in libpart {lib}/{part}: {num} ({nums}) != {name} ({names})")]
    PinCardinalityMismatch {
        lib: String,
        part: String,
        num: String,
        name: String,
        nums: usize,
        names: usize,
    },
    #[error("malformed net {net}: {source}")]
    Net {
        net: String,
        #[source]
        source: ExpandError,
    },
    #[error("mismatch between net and node: {net} ({names}) != ({reference} {pin}) ({nodes})")]
    NetCardinalityMismatch {
        net: String,
        names: usize,
        reference: String,
        pin: String,
        nodes: usize,
    },
}

impl ReplicateError {
    /// True for errors that leave no sensible partial netlist
    pub fn is_fatal(&self) -> bool {
        matches!(self, ReplicateError::Component { .. })
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Parse(#[from] ParseError),
}
