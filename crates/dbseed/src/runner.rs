//! Seeder execution.
//!
//! The [`Runner`] executes selected seeders one at a time, in registration
//! order. Each callback runs behind a failure boundary: an `Err` or a panic
//! is logged and recorded in the [`ExecutionReport`], and the run continues
//! with the next seeder.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use futures::FutureExt;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::{error, info, warn};

use crate::db::{SeedResources, Seeder};
use crate::error::SeedError;
use crate::registry::{Registry, SeederEntry};
use crate::selector::SelectionCriteria;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedStatus {
    Succeeded,
    /// Failed with the captured error or panic message.
    Failed(String),
}

/// Outcome of running one seeder.
#[derive(Debug, Clone)]
pub struct SeedOutcome {
    pub name: String,
    pub environment: String,
    pub started_at: OffsetDateTime,
    pub elapsed: Duration,
    pub status: SeedStatus,
}

impl SeedOutcome {
    pub fn is_success(&self) -> bool {
        self.status == SeedStatus::Succeeded
    }

    /// The failure diagnostic, if the seeder failed.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            SeedStatus::Succeeded => None,
            SeedStatus::Failed(message) => Some(message),
        }
    }
}

/// Outcomes of one run, in execution order.
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    outcomes: Vec<SeedOutcome>,
}

impl ExecutionReport {
    pub fn outcomes(&self) -> &[SeedOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &SeedOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &SeedOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }

    /// Wall-clock start of the first seeder that ran.
    pub fn started_at(&self) -> Option<OffsetDateTime> {
        self.outcomes.first().map(|o| o.started_at)
    }

    pub fn total_elapsed(&self) -> Duration {
        self.outcomes.iter().map(|o| o.elapsed).sum()
    }

    /// Returns the report, or [`SeedError::SeedersFailed`] naming every failed seeder.
    pub fn into_result(self) -> Result<Self, SeedError> {
        if self.is_success() {
            return Ok(self);
        }

        Err(SeedError::SeedersFailed {
            failed: self.failed().map(|o| o.name.clone()).collect(),
        })
    }

    fn push(&mut self, outcome: SeedOutcome) {
        self.outcomes.push(outcome);
    }
}

/// Runs seeders against shared resources.
#[derive(Debug, Clone)]
pub struct Runner {
    resources: SeedResources,
}

impl Runner {
    pub fn new(resources: SeedResources) -> Self {
        Self { resources }
    }

    pub fn resources(&self) -> &SeedResources {
        &self.resources
    }

    /// Runs one seeder. Never fails: errors and panics end up in the outcome.
    pub async fn run(&self, entry: &SeederEntry) -> SeedOutcome {
        let name = entry.name();
        let started_at = OffsetDateTime::now_utc();
        let start = Instant::now();

        info!(seeder = name, "[{}] started seeding...", name);

        let seeder = Seeder::for_entry(&self.resources, entry);
        let result = invoke(entry, seeder).await;
        let elapsed = start.elapsed();

        let status = match result {
            Ok(()) => {
                info!(
                    seeder = name,
                    "[{}] seeded successfully, duration {:?}", name, elapsed
                );
                SeedStatus::Succeeded
            }
            Err(message) => {
                error!(
                    seeder = name,
                    "[{}] seed failed after {:?}: {}", name, elapsed, message
                );
                SeedStatus::Failed(message)
            }
        };

        SeedOutcome {
            name: name.to_string(),
            environment: entry.environment().to_string(),
            started_at,
            elapsed,
            status,
        }
    }

    /// Runs every seeder selected by `criteria`, continuing past failures.
    pub async fn execute(
        &self,
        registry: &Registry,
        criteria: &SelectionCriteria,
    ) -> ExecutionReport {
        info!("{}", criteria.describe());

        for name in registry.unknown_names(criteria) {
            warn!(seeder = name, "[{}] no registered seeder has this name", name);
        }

        let mut report = ExecutionReport::default();
        for entry in registry.select(criteria) {
            report.push(self.run(entry).await);
        }

        let failed = report.failed().count();
        if let Some(started_at) = report.started_at() {
            info!(
                "Seeding started at {} finished: {} succeeded, {} failed, total duration {:?}",
                started_at,
                report.len() - failed,
                failed,
                report.total_elapsed()
            );
        } else {
            info!("Seeding finished: no seeder selected");
        }

        report
    }
}

/// Runs the seeders selected by `criteria` against `pool`.
pub async fn execute(
    registry: &Registry,
    pool: PgPool,
    criteria: &SelectionCriteria,
) -> ExecutionReport {
    Runner::new(SeedResources::new(pool))
        .execute(registry, criteria)
        .await
}

/// Invokes the callback, converting returned errors and panics into a message.
async fn invoke(entry: &SeederEntry, seeder: Seeder) -> Result<(), String> {
    let future = std::panic::catch_unwind(AssertUnwindSafe(|| entry.invoke(seeder)))
        .map_err(panic_message)?;

    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(format!("{err:#}")),
        Err(payload) => Err(panic_message(payload)),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "seeder panicked with a non-string payload".to_string()
    }
}
