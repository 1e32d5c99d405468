use std::hash::BuildHasherDefault;
use wyhash::WyHash;

/// Index into the node pool. 0 and 1 are the FALSE/TRUE sentinels.
pub type NodeId = u32;

/// Ground-set element, 1-based. `u16::MAX` is reserved for sentinel nodes.
pub type Variable = u16;

pub(crate) type HashMap<T, U> = std::collections::HashMap<T, U, BuildHasherDefault<WyHash>>;
pub(crate) type HashSet<T> = std::collections::HashSet<T, BuildHasherDefault<WyHash>>;

pub const FALSE: NodeId = 0;
pub const TRUE: NodeId = 1;

/// Sentinel variable stored on nodes 0 and 1, larger than any real variable
/// so the "strictly increasing along any path" invariant is never violated
/// by comparisons against a sentinel.
pub const SENTINEL_VAR: Variable = Variable::MAX;
