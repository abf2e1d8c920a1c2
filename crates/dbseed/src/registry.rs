//! Seeder registry.
//!
//! The [`Registry`] is an ordered, append-only collection of seeders. The
//! order in which seeders are registered is the order in which they run.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::db::Seeder;
use crate::error::RegistryError;
use crate::names::resolve_name;

/// Environment tag of seeders that apply to every environment.
pub const COMMON_ENV: &str = "";

/// Environment tag used by [`Registry::register_for_test`].
pub const TEST_ENV: &str = "test";

/// Future returned by a boxed seeder callback.
pub type SeedFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Type-erased seeder callback.
pub type SeedFn = Box<dyn Fn(Seeder) -> SeedFuture + Send + Sync>;

fn boxed<F, Fut>(callback: F) -> SeedFn
where
    F: Fn(Seeder) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Box::new(move |seeder| callback(seeder).boxed())
}

/// One registered unit of seeding work.
pub struct SeederEntry {
    name: String,
    environment: String,
    callback: SeedFn,
}

impl SeederEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Returns true for seeders registered without an environment.
    pub fn is_common(&self) -> bool {
        self.environment == COMMON_ENV
    }

    pub(crate) fn invoke(&self, seeder: Seeder) -> SeedFuture {
        (self.callback)(seeder)
    }
}

impl fmt::Debug for SeederEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeederEntry")
            .field("name", &self.name)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of registered seeders.
///
/// # Example
///
/// ```rust,ignore
/// async fn categories_seeder(seeder: Seeder) -> anyhow::Result<()> {
///     seeder.seed_from_json("categories").await?;
///     Ok(())
/// }
///
/// let mut registry = Registry::new();
/// registry.register(categories_seeder)?;
/// registry.register_for_env_named("stage", |s: Seeder| async move { Ok(()) }, "stage_users");
/// ```
#[derive(Default)]
pub struct Registry {
    entries: Vec<SeederEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a seeder. No uniqueness check is made on `name`.
    pub fn push<F, Fut>(
        &mut self,
        name: impl Into<String>,
        environment: impl Into<String>,
        callback: F,
    ) where
        F: Fn(Seeder) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.entries.push(SeederEntry {
            name: name.into(),
            environment: environment.into(),
            callback: boxed(callback),
        });
    }

    /// Registers a seeder for every environment, named after its function.
    pub fn register<F, Fut>(&mut self, callback: F) -> Result<(), RegistryError>
    where
        F: Fn(Seeder) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.register_for_env(COMMON_ENV, callback)
    }

    /// Registers a seeder for the `test` environment, named after its function.
    pub fn register_for_test<F, Fut>(&mut self, callback: F) -> Result<(), RegistryError>
    where
        F: Fn(Seeder) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.register_for_env(TEST_ENV, callback)
    }

    /// Registers a seeder for `environment`, named after its function.
    pub fn register_for_env<F, Fut>(
        &mut self,
        environment: impl Into<String>,
        callback: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(Seeder) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let name = resolve_name(&callback)?;
        self.push(name, environment, callback);
        Ok(())
    }

    /// Registers a seeder for `environment` under an explicit name.
    ///
    /// Works with any callback, including closures.
    pub fn register_for_env_named<F, Fut>(
        &mut self,
        environment: impl Into<String>,
        callback: F,
        name: impl Into<String>,
    ) where
        F: Fn(Seeder) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.push(name, environment, callback);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SeederEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeederEntry> {
        self.entries.iter()
    }

    /// Names of all registered seeders, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(SeederEntry::name).collect()
    }

    /// Returns the most recently registered seeder.
    pub fn last(&self) -> Option<&SeederEntry> {
        self.entries.last()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.entries).finish()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a SeederEntry;
    type IntoIter = std::slice::Iter<'a, SeederEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Two-phase registration: name and environment first, callback later.
///
/// A registration can be completed once. Clones share the completion state,
/// so completing any copy again returns [`RegistryError::AlreadyCompleted`]
/// and leaves the registry untouched. An empty name falls back to the
/// callback's function name.
///
/// ```rust,ignore
/// let mut registration = Registration::new("demo_products").env("demo");
/// registration.complete(&mut registry, demo_products)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registration {
    name: String,
    environment: String,
    completed: Arc<AtomicBool>,
}

impl Registration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the environment the seeder is registered for.
    pub fn env(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }

    /// Finishes the registration by appending the seeder to `registry`.
    pub fn complete<F, Fut>(
        &mut self,
        registry: &mut Registry,
        callback: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(Seeder) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let name = if self.name.is_empty() {
            resolve_name(&callback)?
        } else {
            self.name.clone()
        };

        if self
            .completed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(RegistryError::AlreadyCompleted { name });
        }

        registry.push(name.clone(), self.environment.clone(), callback);
        self.name = name;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn dummy_seeder(_seeder: Seeder) -> anyhow::Result<()> {
        Ok(())
    }

    async fn other_seeder(_seeder: Seeder) -> anyhow::Result<()> {
        Ok(())
    }

    #[test]
    fn test_register() {
        let mut registry = Registry::new();
        registry.register(dummy_seeder).unwrap();

        let entry = registry.last().unwrap();
        assert_eq!(entry.environment(), "");
        assert_eq!(entry.name(), "dummy_seeder");
        assert!(entry.is_common());
    }

    #[test]
    fn test_register_for_test() {
        let mut registry = Registry::new();
        registry.register_for_test(dummy_seeder).unwrap();

        let entry = registry.last().unwrap();
        assert_eq!(entry.environment(), "test");
        assert_eq!(entry.name(), "dummy_seeder");
        assert!(!entry.is_common());
    }

    #[test]
    fn test_register_for_env() {
        let mut registry = Registry::new();
        registry.register_for_env("my_super_env", dummy_seeder).unwrap();

        let entry = registry.last().unwrap();
        assert_eq!(entry.environment(), "my_super_env");
        assert_eq!(entry.name(), "dummy_seeder");
    }

    #[test]
    fn test_register_for_env_named() {
        let mut registry = Registry::new();
        registry.register_for_env_named("my_super_env", dummy_seeder, "custom_name");

        let entry = registry.last().unwrap();
        assert_eq!(entry.environment(), "my_super_env");
        assert_eq!(entry.name(), "custom_name");
    }

    #[test]
    fn test_register_closure_requires_name() {
        let mut registry = Registry::new();
        let result = registry.register(|_s: Seeder| async { Ok(()) });

        assert!(matches!(result, Err(RegistryError::UnnamedSeeder { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_preserves_registration_order_and_duplicates() {
        let mut registry = Registry::new();
        registry.register(other_seeder).unwrap();
        registry.register(dummy_seeder).unwrap();
        registry.register_for_env("stage", dummy_seeder).unwrap();

        assert_eq!(
            registry.names(),
            vec!["other_seeder", "dummy_seeder", "dummy_seeder"]
        );
    }

    #[test]
    fn test_registration_complete() {
        let mut registry = Registry::new();
        let mut registration = Registration::new("test_seed").env("stage");

        registration.complete(&mut registry, dummy_seeder).unwrap();

        assert!(registration.is_completed());
        let entry = registry.last().unwrap();
        assert_eq!(entry.name(), "test_seed");
        assert_eq!(entry.environment(), "stage");
    }

    #[test]
    fn test_registration_complete_twice_fails() {
        let mut registry = Registry::new();
        let mut registration = Registration::new("test_seed");

        registration.complete(&mut registry, dummy_seeder).unwrap();
        let second = registration.complete(&mut registry, other_seeder);

        assert!(matches!(
            second,
            Err(RegistryError::AlreadyCompleted { ref name }) if name == "test_seed"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registration_clone_shares_completion() {
        let mut registry = Registry::new();
        let mut registration = Registration::new("test_seed").env("stage");
        let mut copy = registration.clone();

        registration.complete(&mut registry, dummy_seeder).unwrap();
        let second = copy.complete(&mut registry, dummy_seeder);

        assert!(matches!(
            second,
            Err(RegistryError::AlreadyCompleted { ref name }) if name == "test_seed"
        ));
        assert!(copy.is_completed());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registration_without_name_uses_function_name() {
        let mut registry = Registry::new();
        let mut registration = Registration::default().env("demo");

        registration.complete(&mut registry, other_seeder).unwrap();

        assert_eq!(registration.name(), "other_seeder");
        assert_eq!(registry.last().unwrap().name(), "other_seeder");
    }

    #[test]
    fn test_registration_without_name_rejects_closure() {
        let mut registry = Registry::new();
        let mut registration = Registration::default();

        let result = registration.complete(&mut registry, |_s: Seeder| async { Ok(()) });

        assert!(result.is_err());
        assert!(!registration.is_completed());
        assert!(registry.is_empty());
    }
}
