//! Common utilities that aren't specific to one other subcrate and are unlikely
//! to change frequently.
//!
//! **This crate is not semver compliant**. The version is locked to the root
//! `xbe` crate version. If you choose to depend directly on this crate, you do
//! so at your own risk of breakage.

pub mod paths;
#[cfg(any(test, feature = "test"))]
mod test_util;

#[cfg(any(test, feature = "test"))]
pub use test_util::*;

use std::{error::Error, fmt::Debug, ops::Deref};
use tracing::error;

/// A static mapping between values (of type `T`) and labels (strings). Used to
/// parse user-facing aliases into a canonical value, and to get the canonical
/// label back out.
pub struct Mapping<'a, T: Copy>(&'a [(T, &'a [&'a str])]);

impl<'a, T: Copy> Mapping<'a, T> {
    /// Construct a new mapping
    pub const fn new(mapping: &'a [(T, &'a [&'a str])]) -> Self {
        Self(mapping)
    }

    /// Get a value by one of its labels
    pub fn get(&self, s: &str) -> Option<T> {
        self.0
            .iter()
            .find(|(_, labels)| labels.contains(&s))
            .map(|(value, _)| *value)
    }

    /// Get the first value with any label matching a predicate. Use this for
    /// lookups that are looser than exact string equality
    pub fn find(&self, predicate: impl Fn(&str) -> bool) -> Option<T> {
        self.0
            .iter()
            .find(|(_, labels)| labels.iter().any(|label| predicate(label)))
            .map(|(value, _)| *value)
    }

    /// Get the label mapped to a value. If it has multiple labels, use the
    /// first. Return `None` if the value isn't in the map or has no labels
    pub fn get_label(&self, value: T) -> Option<&'a str>
    where
        T: Debug + PartialEq,
    {
        let (_, labels) = self.0.iter().find(|(v, _)| v == &value)?;
        labels.first().copied()
    }

    /// Get every label for a single value
    pub fn labels(&self, value: T) -> &'a [&'a str]
    where
        T: PartialEq,
    {
        self.0
            .iter()
            .find(|(v, _)| v == &value)
            .map(|(_, labels)| *labels)
            .unwrap_or_default()
    }

    /// Iterate over all mapped values, in declaration order
    pub fn values(&self) -> impl Iterator<Item = T> + use<'a, T> {
        self.0.iter().map(|(value, _)| *value)
    }
}

/// Extension trait for [Result]
pub trait ResultTraced<T, E>: Sized {
    /// If this is an error, trace it. Return the same result.
    #[must_use]
    fn traced(self) -> Self;
}

impl<T, E: 'static + Error> ResultTraced<T, E> for Result<T, E> {
    fn traced(self) -> Self {
        self.inspect_err(|err| error!(error = err as &dyn Error))
    }
}

/// [ResultTraced] but for the `anyhow` result. This has to be a separate trait
/// because we can't put a blanket impl on std `Error` *and* `anyhow::Result`,
/// as the two "could" conflict in the future.
pub trait ResultTracedAnyhow<T, E>: Sized {
    /// If this is an error, trace it. Return the same result.
    #[must_use]
    fn traced(self) -> Self;
}

// Covers `anyhow::Error` without naming it, so this crate doesn't need anyhow
// outside of tests
impl<T, E> ResultTracedAnyhow<T, E> for Result<T, E>
where
    E: Deref<Target = dyn Error + Send + Sync>,
{
    fn traced(self) -> Self {
        self.inspect_err(|err| error!(error = err.deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[derive(Copy, Clone, Debug, PartialEq)]
    enum Fruit {
        Apple,
        Banana,
        Cherry,
    }

    const FRUITS: Mapping<Fruit> = Mapping::new(&[
        (Fruit::Apple, &["apple", "apples"]),
        (Fruit::Banana, &["banana"]),
        (Fruit::Cherry, &[]),
    ]);

    #[rstest]
    #[case::first_label("apple", Some(Fruit::Apple))]
    #[case::second_label("apples", Some(Fruit::Apple))]
    #[case::single_label("banana", Some(Fruit::Banana))]
    #[case::unknown("durian", None)]
    #[case::case_sensitive("Apple", None)]
    fn test_mapping_get(#[case] label: &str, #[case] expected: Option<Fruit>) {
        assert_eq!(FRUITS.get(label), expected);
    }

    #[test]
    fn test_mapping_find() {
        assert_eq!(
            FRUITS.find(|label| label.eq_ignore_ascii_case("APPLES")),
            Some(Fruit::Apple)
        );
        assert_eq!(FRUITS.find(|label| label.starts_with('z')), None);
    }

    #[test]
    fn test_mapping_labels() {
        assert_eq!(FRUITS.get_label(Fruit::Apple), Some("apple"));
        assert_eq!(FRUITS.get_label(Fruit::Cherry), None);
        assert_eq!(FRUITS.labels(Fruit::Apple), &["apple", "apples"]);
        assert_eq!(
            FRUITS.values().collect::<Vec<_>>(),
            vec![Fruit::Apple, Fruit::Banana, Fruit::Cherry]
        );
    }
}
