#![cfg_attr(all(doc, CHANNEL_NIGHTLY), feature(doc_auto_cfg))]

//! Composable boolean filters over single elements.
//!
//! Leaf predicates are combined with [`and`], [`or`] and [`not`] into a
//! [`FilterNode`] tree, which is itself a [`Filter`] and can be combined further.
//! Trees are immutable and evaluated one element at a time:
//!
//! ```
//! use filtr_chain::{and, filter, not, Filter, LeafPredicate};
//!
//! let has_tag = |tag: &'static str| {
//!     filter(LeafPredicate::labelled(tag, move |tags: &Vec<&str>| {
//!         tags.contains(&tag)
//!     }))
//! };
//!
//! let tree = and([has_tag("foo"), not(has_tag("bar"))]);
//!
//! assert!(tree.apply(&vec!["foo"]));
//! assert!(!tree.apply(&vec!["foo", "bar"]));
//! assert_eq!(tree.to_string(), "(foo && !(bar))");
//! ```
//!
//! Leaves may also be plain data types implementing [`Filter`] (or
//! [`TryFilter`] for fallible checks), which keeps trees serializable.
//!
//! ## Feature flags
//!
//! - `serde`: Enables serialization and deserialization of `FilterNode` via serde.
#![doc(html_root_url = "https://docs.rs/filtr-chain/0.1.0/")]

mod combinators;
mod node;
mod predicate;

pub use combinators::*;
pub use node::*;
pub use predicate::*;
