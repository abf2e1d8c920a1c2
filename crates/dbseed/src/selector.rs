//! Selection of the seeders that run in one invocation.

use crate::registry::{Registry, SeederEntry};

/// Describes which registered seeders one run should execute.
///
/// With no names, a seeder runs when no environment is targeted, when its
/// environment matches, or when it is common and common seeders are not
/// skipped. With names, a seeder runs when its name is listed and its
/// environment matches (or no environment is targeted); `skip_common` is
/// ignored in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionCriteria {
    environment: String,
    names: Vec<String>,
    skip_common: bool,
}

impl SelectionCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria selecting every registered seeder.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_env(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Restricts the run to the given seeder names. Blank names are dropped.
    pub fn for_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.names = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        self
    }

    /// Skips common seeders when an environment is targeted and no names are given.
    pub fn skip_common(mut self, skip: bool) -> Self {
        self.skip_common = skip;
        self
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn skips_common(&self) -> bool {
        self.skip_common
    }

    /// Returns true when an explicit name list is present.
    pub fn is_scoped(&self) -> bool {
        !self.names.is_empty()
    }

    pub fn matches(&self, entry: &SeederEntry) -> bool {
        let env_matches =
            self.environment.is_empty() || self.environment == entry.environment();

        if self.is_scoped() {
            return env_matches && self.names.iter().any(|name| name == entry.name());
        }

        env_matches || (entry.is_common() && !self.skip_common)
    }

    /// Human readable summary logged before a run.
    pub fn describe(&self) -> String {
        match (self.is_scoped(), self.environment.is_empty()) {
            (true, true) => format!("Running seeders [{}]...", self.names.join(", ")),
            (true, false) => format!(
                "Running seeders [{}] for env {}...",
                self.names.join(", "),
                self.environment
            ),
            (false, true) => "Running all seeders...".to_string(),
            (false, false) if self.skip_common => {
                format!("Running all seeders for env {}...", self.environment)
            }
            (false, false) => format!(
                "Running all seeders for env {} and common seeds (without env)...",
                self.environment
            ),
        }
    }
}

impl Registry {
    /// Returns the seeders matching `criteria`, in registration order.
    pub fn select<'a>(
        &'a self,
        criteria: &'a SelectionCriteria,
    ) -> impl Iterator<Item = &'a SeederEntry> + 'a {
        self.iter().filter(move |entry| criteria.matches(entry))
    }

    /// Requested names that no registered seeder carries.
    pub fn unknown_names<'a>(&self, criteria: &'a SelectionCriteria) -> Vec<&'a str> {
        criteria
            .names()
            .iter()
            .filter(|name| !self.iter().any(|entry| entry.name() == name.as_str()))
            .map(String::as_str)
            .collect()
    }
}
