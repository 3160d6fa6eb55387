//! Component tree orchestrator. Trees are plain data: built fresh for every
//! projection and serialized as the wire payload.

mod core;

pub use self::core::{Children, ComponentNode, ComponentTree, Props};
