use thiserror::Error;

/// Fatal, caller-facing conditions raised by the engine's public entry
/// points. Internal invariants the engine guarantees about its own pool
/// indices are not modeled here; they are asserted with `unwrap`/`debug_assert`
/// the way an index out of a `Vec` you allocated yourself would be.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("node pool is full (capacity {capacity})")]
    PoolFull { capacity: usize },

    #[error("vmax has not been set")]
    VmaxNotSet,

    #[error("vmax cannot be changed while the stack is non-empty")]
    VmaxAlreadySet,

    #[error("intersection collapsed to a trivial family (FALSE or TRUE)")]
    TrivialIntersection,

    #[error("contains_exactly_n: n ({n}) exceeds the candidate list length ({len})")]
    CountExceedsSetSize { n: u32, len: usize },

    #[error("stack is empty")]
    EmptyStack,
}

pub type Result<T> = std::result::Result<T, EngineError>;
