use std::fmt;

use crate::{Filter, TryFilter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the results of a node's children are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ChainOperator {
    /// Logical AND. An empty intersection is `true`.
    Intersection,
    /// Logical OR. An empty union is `false`.
    Union,
}

impl ChainOperator {
    /// Starting value of the reduction over a node's children.
    #[inline]
    pub const fn seed(self) -> bool {
        match self {
            Self::Intersection => true,
            Self::Union => false,
        }
    }

    #[inline]
    pub const fn combine(self, acc: bool, next: bool) -> bool {
        match self {
            Self::Intersection => acc & next,
            Self::Union => acc | next,
        }
    }

    /// Consumes every result, left to right.
    #[inline]
    fn reduce<I>(self, results: I) -> bool
    where
        I: Iterator<Item = bool>,
    {
        results.fold(self.seed(), |acc, next| self.combine(acc, next))
    }

    /// Stops at the first error.
    #[inline]
    fn try_reduce<I, E>(self, mut results: I) -> Result<bool, E>
    where
        I: Iterator<Item = Result<bool, E>>,
    {
        results.try_fold(self.seed(), |acc, next| Ok(self.combine(acc, next?)))
    }

    fn join(self) -> &'static str {
        match self {
            Self::Intersection => " && ",
            Self::Union => " || ",
        }
    }
}

/// A child of a [`FilterNode`]: either a leaf predicate or a nested node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "kind", content = "value", rename_all = "snake_case")
)]
pub enum AnyFilter<L> {
    Leaf(L),
    Node(FilterNode<L>),
}

impl<L> AnyFilter<L> {
    fn map_with<R, F>(self, f: &mut F) -> AnyFilter<R>
    where
        F: FnMut(L) -> R,
    {
        match self {
            Self::Leaf(leaf) => AnyFilter::Leaf(f(leaf)),
            Self::Node(node) => AnyFilter::Node(node.map_with(f)),
        }
    }

    /// Whether the display form already carries its own parentheses.
    fn is_grouped(&self) -> bool {
        match self {
            Self::Leaf(_) => false,
            Self::Node(node) if node.negated => false,
            Self::Node(node) => match node.children.as_slice() {
                [only] => only.is_grouped(),
                children => children.len() > 1,
            },
        }
    }
}

impl<L> From<FilterNode<L>> for AnyFilter<L> {
    #[inline]
    fn from(node: FilterNode<L>) -> Self {
        Self::Node(node)
    }
}

impl<L, Item> Filter<Item> for AnyFilter<L>
where
    L: Filter<Item>,
    Item: ?Sized,
{
    #[inline]
    fn apply(&self, element: &Item) -> bool {
        match self {
            Self::Leaf(leaf) => L::apply(leaf, element),
            Self::Node(node) => node.apply(element),
        }
    }
}

impl<L, Item> TryFilter<Item> for AnyFilter<L>
where
    L: TryFilter<Item>,
    Item: ?Sized,
{
    type Error = L::Error;

    fn try_apply(&self, element: &Item) -> Result<bool, Self::Error> {
        match self {
            Self::Leaf(leaf) => L::try_apply(leaf, element).inspect_err(|_| {
                tracing::debug!("leaf predicate failed, aborting filter evaluation");
            }),
            Self::Node(node) => node.try_apply(element),
        }
    }
}

impl<L> fmt::Display for AnyFilter<L>
where
    L: fmt::Display,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(leaf) => leaf.fmt(f),
            Self::Node(node) => node.fmt(f),
        }
    }
}

/// An immutable boolean combinator over leaf predicates and nested nodes.
///
/// Nodes are built with [`filter`](crate::filter), [`and`](crate::and),
/// [`or`](crate::or), [`not`](crate::not) and [`identity`](crate::identity)
/// and never change afterwards. Combining or negating a node wraps it in a new
/// one.
///
/// Evaluation reduces every child, in insertion order, starting from the
/// operator's [seed](ChainOperator::seed), then inverts the result if the node
/// is negated. No child is skipped and nothing is cached between calls.
///
/// # Type Parameter
///
/// - `L`: the leaf type. Usually [`LeafPredicate`](crate::LeafPredicate), but
///   any `L: Filter<Item>` works, including plain data types that can be
///   serialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilterNode<L> {
    chain_operator: ChainOperator,
    negated: bool,
    children: Vec<AnyFilter<L>>,
}

impl<L> FilterNode<L> {
    /// Evaluates to `true` for every element.
    pub const IDENTITY: FilterNode<L> = Self::new(ChainOperator::Intersection, false, Vec::new());

    #[inline]
    pub(crate) const fn new(
        chain_operator: ChainOperator,
        negated: bool,
        children: Vec<AnyFilter<L>>,
    ) -> Self {
        Self {
            chain_operator,
            negated,
            children,
        }
    }

    #[inline]
    pub fn chain_operator(&self) -> ChainOperator {
        self.chain_operator
    }

    #[inline]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    #[inline]
    pub fn children(&self) -> &[AnyFilter<L>] {
        &self.children
    }

    /// `self AND other`, as a new node.
    #[inline]
    pub fn and(self, other: impl Into<AnyFilter<L>>) -> Self {
        Self::new(
            ChainOperator::Intersection,
            false,
            vec![self.into(), other.into()],
        )
    }

    /// `self OR other`, as a new node.
    #[inline]
    pub fn or(self, other: impl Into<AnyFilter<L>>) -> Self {
        Self::new(ChainOperator::Union, false, vec![self.into(), other.into()])
    }

    /// `NOT self`, as a new node.
    #[inline]
    pub fn negate(self) -> Self {
        Self::new(ChainOperator::Intersection, true, vec![self.into()])
    }

    /// Rebuilds the tree with every leaf transformed, keeping operators,
    /// negation and child order.
    #[inline]
    pub fn map<R, F>(self, mut f: F) -> FilterNode<R>
    where
        F: FnMut(L) -> R,
    {
        self.map_with(&mut f)
    }

    fn map_with<R, F>(self, f: &mut F) -> FilterNode<R>
    where
        F: FnMut(L) -> R,
    {
        let Self {
            chain_operator,
            negated,
            children,
        } = self;

        let children = children
            .into_iter()
            .map(|child| child.map_with(&mut *f))
            .collect();

        FilterNode::new(chain_operator, negated, children)
    }

    /// Bottom-up reduction over the tree.
    ///
    /// `transform` turns each leaf into an `R`, `combine` merges the values of
    /// one node's children and `invert` is applied to negated nodes.
    #[inline]
    pub fn fold<R, C, I, T>(&self, combine: C, invert: I, mut transform: T) -> R
    where
        C: Fn(ChainOperator, &mut dyn Iterator<Item = R>) -> R,
        I: Fn(R) -> R,
        T: FnMut(&L) -> R,
    {
        self.fold_with(&combine, &invert, &mut transform)
    }

    fn fold_with<R, C, I, T>(&self, combine: &C, invert: &I, transform: &mut T) -> R
    where
        C: Fn(ChainOperator, &mut dyn Iterator<Item = R>) -> R,
        I: Fn(R) -> R,
        T: FnMut(&L) -> R,
    {
        let mut children = self.children.iter().map(|child| match child {
            AnyFilter::Leaf(leaf) => transform(leaf),
            AnyFilter::Node(node) => node.fold_with(combine, invert, &mut *transform),
        });

        let combined = combine(self.chain_operator, &mut children);

        if self.negated {
            invert(combined)
        } else {
            combined
        }
    }

    fn fmt_combination(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        L: fmt::Display,
    {
        let mut children = self.children.iter();

        let Some(first) = children.next() else {
            return write!(f, "{}", self.chain_operator.seed());
        };

        if self.children.len() == 1 {
            return fmt::Display::fmt(first, f);
        }

        f.write_str("(")?;
        fmt::Display::fmt(first, f)?;

        let join = self.chain_operator.join();
        for child in children {
            f.write_str(join)?;
            fmt::Display::fmt(child, f)?;
        }

        f.write_str(")")
    }
}

impl<L> Default for FilterNode<L> {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl<L, Item> Filter<Item> for FilterNode<L>
where
    L: Filter<Item>,
    Item: ?Sized,
{
    fn apply(&self, element: &Item) -> bool {
        let reduced = self
            .chain_operator
            .reduce(self.children.iter().map(|child| child.apply(element)));
        let result = reduced != self.negated;

        tracing::trace!(
            operator = %self.chain_operator,
            negated = self.negated,
            children = self.children.len(),
            result,
            "evaluated filter node"
        );

        result
    }
}

impl<L, Item> TryFilter<Item> for FilterNode<L>
where
    L: TryFilter<Item>,
    Item: ?Sized,
{
    type Error = L::Error;

    fn try_apply(&self, element: &Item) -> Result<bool, Self::Error> {
        let reduced = self
            .chain_operator
            .try_reduce(self.children.iter().map(|child| child.try_apply(element)))?;

        Ok(reduced != self.negated)
    }
}

impl<L> fmt::Display for FilterNode<L>
where
    L: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.negated {
            return self.fmt_combination(f);
        }

        match self.children.as_slice() {
            [only] if only.is_grouped() => {
                f.write_str("!")?;
                only.fmt(f)
            }
            _ => {
                f.write_str("!(")?;
                self.fmt_combination(f)?;
                f.write_str(")")
            }
        }
    }
}
