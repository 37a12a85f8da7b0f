//! OSC Query Core
//!
//! Core data model for an OSC Query endpoint:
//! - The address-space tree ([`AddressSpace`], [`Node`])
//! - The OSC type alphabet and access semantics ([`TypeCode`], [`Access`])
//! - Projection to the OSC Query JSON dialect ([`serialize_node`])
//!
//! This crate is synchronous and does no I/O; the server crate wraps the
//! tree in a reader-writer lock and drives it from the HTTP and UDP sides.

pub mod error;
pub mod json;
pub mod node;
pub mod tree;
pub mod value;

pub use error::{Error, Result};
pub use json::{serialize_node, type_string};
pub use node::{Argument, MethodSpec, Node, Range};
pub use tree::AddressSpace;
pub use value::{value_to_json, Access, ArgType, ClipMode, TypeCode};
