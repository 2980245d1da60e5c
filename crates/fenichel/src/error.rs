//! Error types for the reduction engine.

use thiserror::Error;

use fenichel_ideal::KernelError;

/// Errors raised while building or validating a model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The model has no state variables.
    #[error("a model needs at least one state variable")]
    EmptyStates,

    /// A state or parameter name is the empty string.
    #[error("symbol names cannot be empty")]
    EmptySymbolName,

    /// The same name appears twice among the states and parameters.
    #[error("duplicate symbol `{0}`")]
    DuplicateSymbol(String),

    /// The separability mask does not match the parameter list.
    #[error("separability mask has {got} entries for {expected} parameters")]
    MaskLength {
        /// Number of parameters.
        expected: usize,
        /// Number of mask entries supplied.
        got: usize,
    },

    /// The right-hand side does not have one component per state.
    #[error("right-hand side has {got} components for {expected} states")]
    RhsLength {
        /// Number of states.
        expected: usize,
        /// Number of components supplied.
        got: usize,
    },

    /// The combined ring does not fit the packed monomial representation.
    /// One slot beyond the states and parameters is reserved for
    /// saturation tests.
    #[error("model needs {needed} ring variables but at most {max} are supported")]
    Capacity {
        /// Variables required, including the reserved slot.
        needed: usize,
        /// Maximum supported.
        max: usize,
    },

    /// The requested slow dimension is not strictly between 0 and the
    /// number of states.
    #[error("target dimension {s} is outside 1..{n}")]
    TargetDimension {
        /// Requested dimension.
        s: usize,
        /// Number of states.
        n: usize,
    },

    /// A parameter name was not found in the model.
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    /// A parameter marked fixed was asked to become small.
    #[error("parameter `{0}` is not separable")]
    NotSeparable(String),

    /// Too many separable parameters for subset enumeration.
    #[error("{count} separable parameters exceed the enumeration limit of {max}")]
    TooManySeparable {
        /// Separable parameters in the model.
        count: usize,
        /// Maximum supported.
        max: usize,
    },

    /// A parameter point has the wrong number of coordinates.
    #[error("parameter point has {got} coordinates for {expected} parameters")]
    PointLength {
        /// Number of parameters.
        expected: usize,
        /// Number of coordinates supplied.
        got: usize,
    },
}

/// Any error the engine can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The model or a request against it is malformed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The algebra kernel rejected a computation.
    #[error("algebra kernel: {0}")]
    Algebra(#[from] KernelError),
}
