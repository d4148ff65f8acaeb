//! Factory functions for building [`FilterNode`] trees.

use crate::{AnyFilter, ChainOperator, FilterNode};

/// Wraps a single leaf predicate in a node.
///
/// The result evaluates exactly like `predicate`.
#[inline]
pub fn filter<L>(predicate: L) -> FilterNode<L> {
    FilterNode::new(
        ChainOperator::Intersection,
        false,
        vec![AnyFilter::Leaf(predicate)],
    )
}

/// Passes when every item passes. `and` of nothing always passes.
#[inline]
pub fn and<L>(items: impl IntoIterator<Item = impl Into<AnyFilter<L>>>) -> FilterNode<L> {
    FilterNode::new(
        ChainOperator::Intersection,
        false,
        items.into_iter().map(Into::into).collect(),
    )
}

/// Passes when at least one item passes. `or` of nothing never passes.
#[inline]
pub fn or<L>(items: impl IntoIterator<Item = impl Into<AnyFilter<L>>>) -> FilterNode<L> {
    FilterNode::new(
        ChainOperator::Union,
        false,
        items.into_iter().map(Into::into).collect(),
    )
}

#[inline]
pub fn not<L>(item: impl Into<AnyFilter<L>>) -> FilterNode<L> {
    FilterNode::new(ChainOperator::Intersection, true, vec![item.into()])
}

/// A node that passes every element. Same as [`FilterNode::IDENTITY`].
#[inline]
pub const fn identity<L>() -> FilterNode<L> {
    FilterNode::IDENTITY
}
