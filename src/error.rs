//! Error types for figured bass parsing, fonts, layout and interchange
//!
//! Parse errors are all-or-nothing for an annotation: any item failure sends
//! the owning FiguredBass back to literal text. Font and layout errors are
//! recovered by their callers and only show up in logs.

use thiserror::Error;

/// Failure to parse one line of a figured bass annotation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A character sequence that no slot at this position accepts
    #[error("malformed token '{found}' at column {column}")]
    MalformedToken { column: usize, found: String },

    /// No digit, modifier or continuation line present
    #[error("empty figured bass item")]
    EmptyItem,

    /// Characters left over after every slot was tried
    #[error("unexpected trailing text '{rest}' at column {column}")]
    TrailingGarbage { column: usize, rest: String },

    /// Each part is valid on its own but the combination is not
    #[error("invalid combination: {0}")]
    InvalidCombination(&'static str),
}

/// Parse failure of a whole multi-line annotation, pointing at the bad line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {source}")]
pub struct AnnotationError {
    pub line: usize,
    #[source]
    pub source: ParseError,
}

/// Glyph table lookup failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FontError {
    #[error("no such figured bass font: '{0}'")]
    UnknownFont(String),
}

/// Font configuration loading failure
#[derive(Debug, Error)]
pub enum FontConfigError {
    #[error("failed to read font config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse font config as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid font config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Layout conditions; never surfaced past the layout pass
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("no forward boundary after tick {tick} on staff {staff}")]
    NoForwardBoundary { staff: usize, tick: u32 },
}

/// Failure to apply a structured edit to a figured bass
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no figured bass item with order {0}")]
    NoSuchItem(usize),

    #[error("figured bass is unparsed literal text")]
    NotParsed,

    #[error("parenthesis slot {0} out of range")]
    NoSuchSlot(usize),

    #[error("edit would produce an invalid item: {0}")]
    Invalid(#[from] ParseError),

    #[error("no undo history available")]
    NothingToUndo,

    #[error("no redo history available")]
    NothingToRedo,
}

/// MusicXML `<figured-bass>` import failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MusicXmlError {
    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("missing required element: {0}")]
    MissingElement(String),

    #[error("invalid value '{value}' for element '{element}'")]
    InvalidValue { element: String, value: String },

    #[error("figure {index}: {source}")]
    InvalidFigure {
        index: usize,
        #[source]
        source: ParseError,
    },
}

/// Native JSON interchange failure
#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("item {order}: {source}")]
    InvalidItem {
        order: usize,
        #[source]
        source: ParseError,
    },
}
