//! Common imports used throughout the crate.

pub use std::fmt::{self, Debug, Display};
pub use std::hash::Hash;
pub use std::collections::HashMap as UnorderedMap;
