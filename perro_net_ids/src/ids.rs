//! Compact one-byte identifiers for the network schema.
//! Every ID is a plain `u8` assigned sequentially from 0 by the compiler.
//! `LIMIT` is the number of distinct IDs a single scene (or a single run, for
//! `SceneId`) may hold; allocation past it is a capacity error upstream.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Defines a compact sequential ID type (SceneId, PropertyIndex, etc.).
macro_rules! define_compact_id {
    ($type_name:ident, $limit:expr, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $type_name(pub u8);

        impl $type_name {
            /// Maximum number of IDs of this kind.
            pub const LIMIT: usize = $limit;

            /// ID for the `count`-th allocation (0-based), or `None` once the limit is reached.
            #[inline]
            pub const fn from_count(count: usize) -> Option<Self> {
                if count < Self::LIMIT {
                    Some(Self(count as u8))
                } else {
                    None
                }
            }

            #[inline]
            pub const fn as_u8(self) -> u8 {
                self.0
            }

            #[inline]
            pub const fn as_usize(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $type_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($type_name), "({})"), self.0)
            }
        }

        impl fmt::Display for $type_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_compact_id!(
    SceneId,
    255,
    "Scene ID: one per network scene, first-seen order within a compiler run."
);
define_compact_id!(
    StaticNodeId,
    256,
    "Static network node ID: path identifier of a node inside its network scene."
);
define_compact_id!(
    PropertyIndex,
    64,
    "Property index: shared by every node of a scene's flattened property space."
);
define_compact_id!(
    FunctionIndex,
    255,
    "Function index: shared by every node of a scene's flattened function space."
);
