//! Test and group registration bookkeeping.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::case::TestCase;
use crate::error::{DomainError, DomainResult};

/// The store of all known test cases and groups.
///
/// Built once at startup through [`RegistryBuilder`] and read-only
/// afterwards, so it can be shared across concurrent sessions without
/// locking. Holds no execution state.
#[derive(Debug, Default)]
pub struct Registry {
    tests: Vec<Arc<TestCase>>,
    groups: IndexMap<String, Vec<Arc<TestCase>>>,
}

impl Registry {
    /// Starts an empty registration builder.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// All registered cases, in registration order.
    #[must_use]
    pub fn tests(&self) -> &[Arc<TestCase>] {
        &self.tests
    }

    /// Groups in creation order, each with its cases in registration
    /// order.
    #[must_use]
    pub const fn groups(&self) -> &IndexMap<String, Vec<Arc<TestCase>>> {
        &self.groups
    }

    /// The ordered cases of one group.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::GroupNotFound`] when no test was ever
    /// registered under `name`.
    pub fn group(&self, name: &str) -> DomainResult<&[Arc<TestCase>]> {
        self.groups
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| DomainError::GroupNotFound(name.to_string()))
    }

    /// The subsequence of [`tests()`](Self::tests) whose name is in
    /// `names`, preserving registration order rather than the order the
    /// names were supplied in. Every entry sharing a requested name is
    /// returned.
    #[must_use]
    pub fn find_by_names<S: AsRef<str>>(&self, names: &[S]) -> Vec<Arc<TestCase>> {
        let wanted: HashSet<&str> = names.iter().map(AsRef::as_ref).collect();
        self.tests
            .iter()
            .filter(|case| wanted.contains(case.name()))
            .cloned()
            .collect()
    }

    /// Number of registered cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

/// Collects registrations before the registry is frozen.
///
/// The explicit-call equivalent of the decorator table the harness is
/// driven by: each [`add`](Self::add) fixes a case's name, group and
/// skip flag for the process lifetime.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    tests: Vec<Arc<TestCase>>,
    groups: IndexMap<String, Vec<Arc<TestCase>>>,
}

impl RegistryBuilder {
    /// Starts an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a case, creating its group on first use.
    ///
    /// Duplicate names are not rejected; both registrations stay
    /// distinct entries in registration order.
    #[must_use]
    pub fn add(mut self, case: TestCase) -> Self {
        let case = Arc::new(case);
        self.groups
            .entry(case.group().to_string())
            .or_default()
            .push(Arc::clone(&case));
        self.tests.push(case);
        self
    }

    /// Freezes the registrations into an immutable [`Registry`].
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            tests: self.tests,
            groups: self.groups,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn noop(name: &str) -> TestCase {
        TestCase::new(name, |_env| async { Ok(()) })
    }

    fn sample_registry() -> Registry {
        Registry::builder()
            .add(noop("alpha").in_group("First"))
            .add(noop("beta").in_group("Second"))
            .add(noop("gamma").in_group("First"))
            .add(noop("delta"))
            .build()
    }

    #[test]
    fn preserves_registration_order() {
        let registry = sample_registry();
        let names: Vec<&str> = registry.tests().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma", "delta"]);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn groups_created_in_first_use_order() {
        let registry = sample_registry();
        let groups: Vec<&str> = registry.groups().keys().map(String::as_str).collect();
        assert_eq!(groups, vec!["First", "Second", "Ungrouped"]);

        let first: Vec<&str> = registry.group("First").unwrap().iter().map(|c| c.name()).collect();
        assert_eq!(first, vec!["alpha", "gamma"]);
    }

    #[test]
    fn unknown_group_is_an_error() {
        let registry = sample_registry();
        assert_eq!(
            registry.group("NoSuchGroup").unwrap_err(),
            DomainError::GroupNotFound("NoSuchGroup".to_string())
        );
    }

    #[test]
    fn find_by_names_keeps_registry_order() {
        let registry = sample_registry();
        // Names supplied out of order; results come back in registry order.
        let found = registry.find_by_names(&["delta", "alpha"]);
        let names: Vec<&str> = found.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["alpha", "delta"]);
    }

    #[test]
    fn find_by_names_ignores_unknown_names() {
        let registry = sample_registry();
        let found = registry.find_by_names(&["alpha", "missing"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "alpha");
    }

    #[test]
    fn duplicate_names_stay_distinct_and_all_match() {
        let registry = Registry::builder()
            .add(noop("dup").in_group("A"))
            .add(noop("other"))
            .add(noop("dup").in_group("B"))
            .build();

        assert_eq!(registry.len(), 3);
        let found = registry.find_by_names(&["dup"]);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].group(), "A");
        assert_eq!(found[1].group(), "B");
    }
}
