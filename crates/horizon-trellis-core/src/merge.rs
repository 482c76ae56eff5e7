//! Conflict-aware shallow map merging.
//!
//! [`safe_merge`] combines two attribute maps without mutating either. The
//! conflict policy is explicit: by default an existing key in the base map
//! wins, and [`MergeOptions`] can flip that (`overwrite`) or gate individual
//! keys with predicates (`except_for`, `only_for`).
//!
//! This is the primitive the factory inheritance chain is built on: a child
//! factory's options are the safe-merge of its overrides (base) with its
//! parent's resolved options (incoming).

use std::fmt;
use std::sync::Arc;

use crate::value::AttributeMap;

/// A shareable predicate over attribute keys.
pub type KeyPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Conflict-resolution policy for [`safe_merge`].
///
/// All fields are optional; the default policy is "do not overwrite, no
/// filtering".
#[derive(Clone, Default)]
pub struct MergeOptions {
    /// When `true`, incoming values replace existing base values.
    pub overwrite: bool,
    /// Keys for which this predicate returns `true` are never copied.
    pub except_for: Option<KeyPredicate>,
    /// When present, only keys for which this predicate returns `true`
    /// are copied.
    pub only_for: Option<KeyPredicate>,
}

impl MergeOptions {
    /// The default policy: existing keys win, no key filtering.
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy where incoming values replace existing ones.
    pub fn overwriting() -> Self {
        Self {
            overwrite: true,
            ..Self::default()
        }
    }

    /// Sets the overwrite flag.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Excludes keys matching the predicate from the merge.
    pub fn with_except_for<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.except_for = Some(Arc::new(predicate));
        self
    }

    /// Restricts the merge to keys matching the predicate.
    pub fn with_only_for<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.only_for = Some(Arc::new(predicate));
        self
    }

    /// Returns `true` if the policy permits copying `key` given whether the
    /// base map already holds it.
    fn permits(&self, key: &str, present_in_base: bool) -> bool {
        (!present_in_base || self.overwrite)
            && self.except_for.as_ref().is_none_or(|except| !except(key))
            && self.only_for.as_ref().is_none_or(|only| only(key))
    }
}

impl fmt::Debug for MergeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeOptions")
            .field("overwrite", &self.overwrite)
            .field("except_for", &self.except_for.as_ref().map(|_| ".."))
            .field("only_for", &self.only_for.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Produces a new map that is a shallow copy of `base`, extended with the
/// entries of `incoming` that the policy permits.
///
/// For each key of `incoming`, the value is copied iff:
/// - the key is absent from `base`, or `options.overwrite` is set, and
/// - no `except_for` predicate matches the key, and
/// - the `only_for` predicate (when present) matches the key.
///
/// Neither input is mutated. There are no error conditions.
pub fn safe_merge(
    base: &AttributeMap,
    incoming: &AttributeMap,
    options: &MergeOptions,
) -> AttributeMap {
    let mut merged = base.clone();
    for (key, value) in incoming.iter() {
        if options.permits(key, base.contains_key(key)) {
            merged.insert(key, value.clone());
        }
    }
    merged
}
