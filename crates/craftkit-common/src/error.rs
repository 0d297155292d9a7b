//! Error types for craftkit.

use thiserror::Error;

/// Top-level error type for craftkit operations.
#[derive(Debug, Error)]
pub enum CraftkitError {
    /// Crafting grid contract violations
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// Malformed recipe definitions
    #[error("Recipe error: {0}")]
    Recipe(#[from] RecipeError),

    /// Invalid item keys
    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Crafting grid contract violations.
///
/// These indicate a bug in whatever snapshotted the inventory; they are
/// never a "no match" outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Grid does not have exactly nine slots
    #[error("Invalid grid size: expected {expected} slots, got {actual}")]
    InvalidSize {
        /// Required slot count
        expected: usize,
        /// Slot count supplied
        actual: usize,
    },
}

/// Malformed recipe definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    /// Shaped recipe with no rows
    #[error("Shaped recipe has no rows")]
    EmptyShape,

    /// Shaped recipe with an empty row
    #[error("Shaped recipe has zero columns")]
    EmptyRow,

    /// Rows of a shaped recipe differ in length
    #[error("Shape row {row} has length {actual}, expected {expected}")]
    RowLengthMismatch {
        /// Offending row index
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        actual: usize,
    },

    /// Shape does not fit inside the 3x3 grid
    #[error("Shape is {rows}x{columns}, larger than 3x3")]
    ShapeTooLarge {
        /// Row count
        rows: usize,
        /// Column count
        columns: usize,
    },

    /// Ingredient requires zero items
    #[error("Ingredient {0} requires a zero quantity")]
    ZeroQuantity(String),

    /// Shapeless recipe with no ingredients
    #[error("Shapeless recipe has no ingredients")]
    NoIngredients,

    /// Shapeless recipe with more ingredients than grid slots
    #[error("Shapeless recipe has {0} ingredients, at most 9 fit in the grid")]
    TooManyIngredients(usize),

    /// Ingredient map uses the blank symbol
    #[error("The blank symbol cannot be mapped to an ingredient")]
    BlankSymbolMapped,

    /// Output stack cannot hold a single item
    #[error("Recipe output has a max stack size of zero")]
    ZeroMaxStack,
}

/// Invalid item keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Namespace or path is empty
    #[error("Item key has an empty namespace or path")]
    Empty,

    /// Namespace contains a forbidden character
    #[error("Invalid character {character:?} in namespace {namespace:?}")]
    InvalidNamespace {
        /// Namespace as supplied
        namespace: String,
        /// First forbidden character
        character: char,
    },

    /// Path contains a forbidden character
    #[error("Invalid character {character:?} in path {path:?}")]
    InvalidPath {
        /// Path as supplied
        path: String,
        /// First forbidden character
        character: char,
    },
}

/// Result type alias for craftkit operations.
pub type CraftkitResult<T> = Result<T, CraftkitError>;
