use std::{borrow::Cow, convert::Infallible, fmt, future::Future, pin::Pin, sync::Arc};

/// Decides whether a single element passes.
///
/// Implemented for every closure `Fn(&Item) -> bool`, for [`LeafPredicate`] and
/// for filter trees whose leaves are themselves filters.
pub trait Filter<Item: ?Sized> {
    fn apply(&self, element: &Item) -> bool;
}

impl<F, Item> Filter<Item> for F
where
    F: Fn(&Item) -> bool,
    Item: ?Sized,
{
    #[inline]
    fn apply(&self, element: &Item) -> bool {
        self(element)
    }
}

/// Fallible counterpart of [`Filter`].
///
/// A failing leaf aborts the whole evaluation and its error is returned as is.
pub trait TryFilter<Item: ?Sized> {
    type Error;

    fn try_apply(&self, element: &Item) -> Result<bool, Self::Error>;
}

impl<F, Item, E> TryFilter<Item> for F
where
    F: Fn(&Item) -> Result<bool, E>,
    Item: ?Sized,
{
    type Error = E;

    #[inline]
    fn try_apply(&self, element: &Item) -> Result<bool, E> {
        self(element)
    }
}

/// Deferred predicate outcome.
///
/// Nothing in this crate evaluates these; the alias exists so that callers
/// filtering asynchronously can name the shape.
pub type AsyncLeafPredicate<Item> =
    Arc<dyn Fn(&Item) -> Pin<Box<dyn Future<Output = bool> + Send>> + Send + Sync>;

/// A shared, type-erased predicate function.
///
/// Cloning is cheap: the closure sits behind an [`Arc`], so every clone of a
/// filter tree calls the same function.
pub struct LeafPredicate<Item: ?Sized> {
    label: Option<Cow<'static, str>>,
    predicate: Arc<dyn Fn(&Item) -> bool + Send + Sync>,
}

impl<Item: ?Sized> LeafPredicate<Item> {
    #[inline]
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Item) -> bool + Send + Sync + 'static,
    {
        Self {
            label: None,
            predicate: Arc::new(predicate),
        }
    }

    /// Like [`LeafPredicate::new`], with a name used when the tree is displayed.
    #[inline]
    pub fn labelled<F>(label: impl Into<Cow<'static, str>>, predicate: F) -> Self
    where
        F: Fn(&Item) -> bool + Send + Sync + 'static,
    {
        Self {
            label: Some(label.into()),
            predicate: Arc::new(predicate),
        }
    }

    #[inline]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Shorthand for [`LeafPredicate::new`].
#[inline]
pub fn predicate<Item, F>(f: F) -> LeafPredicate<Item>
where
    Item: ?Sized,
    F: Fn(&Item) -> bool + Send + Sync + 'static,
{
    LeafPredicate::new(f)
}

impl<Item: ?Sized> Clone for LeafPredicate<Item> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<Item: ?Sized> fmt::Debug for LeafPredicate<Item> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafPredicate")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl<Item: ?Sized> fmt::Display for LeafPredicate<Item> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("<predicate>"))
    }
}

impl<Item: ?Sized> Filter<Item> for LeafPredicate<Item> {
    #[inline]
    fn apply(&self, element: &Item) -> bool {
        (self.predicate)(element)
    }
}

impl<Item: ?Sized> TryFilter<Item> for LeafPredicate<Item> {
    type Error = Infallible;

    #[inline]
    fn try_apply(&self, element: &Item) -> Result<bool, Infallible> {
        Ok(self.apply(element))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn closures_are_filters() {
        let even = |value: &i32| value % 2 == 0;

        assert!(even.apply(&4));
        assert!(!even.apply(&5));
    }

    #[test]
    fn leaf_predicate_calls_wrapped_function() {
        let short = LeafPredicate::new(|s: &str| s.len() < 4);

        assert!(short.apply("abc"));
        assert!(!short.apply("abcd"));
        assert_eq!(short.try_apply("ab"), Ok(true));
    }

    #[test]
    fn clones_share_the_same_function() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let leaf = predicate(move |_: &u8| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });
        let copy = leaf.clone();

        leaf.apply(&1);
        copy.apply(&2);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn display_uses_label() {
        let labelled = LeafPredicate::labelled("positive", |v: &i64| *v > 0);
        let anonymous = LeafPredicate::new(|v: &i64| *v > 0);

        assert_eq!(labelled.to_string(), "positive");
        assert_eq!(anonymous.to_string(), "<predicate>");
        assert_eq!(anonymous.label(), None);
    }

    #[test]
    fn fallible_closures_propagate_errors() {
        let parse = |s: &str| s.parse::<i32>().map(|v| v > 10);

        assert_eq!(parse.try_apply("42"), Ok(true));
        assert!(parse.try_apply("forty-two").is_err());
    }
}
