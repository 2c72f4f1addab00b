//! Admin dashboard refresh loop.
//!
//! One task owns the [`AdminSnapshot`]. Tab switches, manual refreshes, the interval
//! tick, and store change events are funnelled into it as messages; everything that
//! arrives inside the debounce window is folded into a single fetch pass, and the
//! result is published on a `watch` channel.

use std::collections::{BTreeMap, BTreeSet};
use std::future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};

use super::service::{AdminApplicationView, AdminError, AdminService};
use super::filters::{ApplicationFilters, ArticleFilters, JobFilters};
use crate::careers::domain::Job;
use crate::config::RefreshConfig;
use crate::insights::domain::Article;
use crate::store::{ApplicationStore, ArticleStore, JobStore, Table, TableChange};

const TRIGGER_QUEUE_DEPTH: usize = 32;
const MIN_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminTab {
    #[default]
    Applications,
    Jobs,
    Articles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    TabSwitch(AdminTab),
    Manual,
    Interval,
    Change(Table),
}

impl RefreshTrigger {
    fn collect_tables(self, pending: &mut BTreeSet<Table>) {
        match self {
            RefreshTrigger::Change(table) => {
                pending.insert(table);
            }
            RefreshTrigger::TabSwitch(_) | RefreshTrigger::Manual | RefreshTrigger::Interval => {
                pending.extend(Table::ALL);
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminSnapshot {
    /// Number of completed fetch passes. Zero until the initial load lands.
    pub generation: u64,
    pub active_tab: AdminTab,
    pub jobs: Vec<Job>,
    pub applications: Vec<AdminApplicationView>,
    pub articles: Vec<Article>,
    /// Last fetch error per table name; cleared on the next successful fetch.
    pub errors: BTreeMap<&'static str, String>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Full-collection reads backing the dashboard.
pub trait CollectionSource: Send + Sync + 'static {
    fn fetch_jobs(&self) -> Result<Vec<Job>, AdminError>;
    fn fetch_applications(&self) -> Result<Vec<AdminApplicationView>, AdminError>;
    fn fetch_articles(&self) -> Result<Vec<Article>, AdminError>;
}

impl<S> CollectionSource for AdminService<S>
where
    S: JobStore + ApplicationStore + ArticleStore + 'static,
{
    fn fetch_jobs(&self) -> Result<Vec<Job>, AdminError> {
        self.list_jobs(JobFilters::default())
    }

    fn fetch_applications(&self) -> Result<Vec<AdminApplicationView>, AdminError> {
        self.list_applications(ApplicationFilters::default())
    }

    fn fetch_articles(&self) -> Result<Vec<Article>, AdminError> {
        self.list_articles(ArticleFilters::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("admin refresh loop has stopped")]
pub struct RefreshStopped;

/// Cloneable front door to a running [`RefreshCoordinator`].
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    triggers: mpsc::Sender<RefreshTrigger>,
    snapshots: watch::Receiver<AdminSnapshot>,
}

impl RefreshHandle {
    pub async fn request(&self, trigger: RefreshTrigger) -> Result<(), RefreshStopped> {
        self.triggers.send(trigger).await.map_err(|_| RefreshStopped)
    }

    pub async fn switch_tab(&self, tab: AdminTab) -> Result<(), RefreshStopped> {
        self.request(RefreshTrigger::TabSwitch(tab)).await
    }

    pub async fn refresh_now(&self) -> Result<(), RefreshStopped> {
        self.request(RefreshTrigger::Manual).await
    }

    pub fn snapshot(&self) -> AdminSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AdminSnapshot> {
        self.snapshots.clone()
    }
}

pub struct RefreshCoordinator<C> {
    source: Arc<C>,
    config: RefreshConfig,
    snapshot: AdminSnapshot,
    publisher: watch::Sender<AdminSnapshot>,
}

impl<C> RefreshCoordinator<C>
where
    C: CollectionSource,
{
    /// Start the loop on the current runtime. An initial load of every collection is
    /// scheduled immediately. The task exits once every handle has been dropped.
    pub fn spawn(
        source: Arc<C>,
        changes: Option<broadcast::Receiver<TableChange>>,
        config: RefreshConfig,
    ) -> RefreshHandle {
        let (triggers, trigger_rx) = mpsc::channel(TRIGGER_QUEUE_DEPTH);
        let (publisher, snapshots) = watch::channel(AdminSnapshot::default());

        let coordinator = RefreshCoordinator {
            source,
            config,
            snapshot: AdminSnapshot::default(),
            publisher,
        };
        tokio::spawn(coordinator.run(trigger_rx, changes));

        RefreshHandle {
            triggers,
            snapshots,
        }
    }

    async fn run(
        mut self,
        mut triggers: mpsc::Receiver<RefreshTrigger>,
        mut changes: Option<broadcast::Receiver<TableChange>>,
    ) {
        let period = self.config.interval.max(MIN_INTERVAL);
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut pending: BTreeSet<Table> = Table::ALL.into_iter().collect();
        let mut deadline = Some(Instant::now());

        loop {
            tokio::select! {
                trigger = triggers.recv() => match trigger {
                    Some(trigger) => {
                        if let RefreshTrigger::TabSwitch(tab) = trigger {
                            self.snapshot.active_tab = tab;
                        }
                        trigger.collect_tables(&mut pending);
                        deadline.get_or_insert_with(|| Instant::now() + self.config.debounce);
                    }
                    None => break,
                },
                change = next_change(&mut changes) => match change {
                    Ok(change) => {
                        RefreshTrigger::Change(change.table).collect_tables(&mut pending);
                        deadline.get_or_insert_with(|| Instant::now() + self.config.debounce);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "admin change feed lagged; refreshing every collection");
                        pending.extend(Table::ALL);
                        deadline.get_or_insert_with(|| Instant::now() + self.config.debounce);
                    }
                    Err(RecvError::Closed) => {
                        tracing::debug!("admin change feed closed");
                        changes = None;
                    }
                },
                _ = ticker.tick() => {
                    RefreshTrigger::Interval.collect_tables(&mut pending);
                    deadline.get_or_insert_with(|| Instant::now() + self.config.debounce);
                }
                _ = wait_until(deadline) => {
                    let tables = std::mem::take(&mut pending);
                    deadline = None;
                    self.refresh(&tables);
                }
            }
        }

        tracing::debug!("admin refresh loop stopped");
    }

    fn refresh(&mut self, tables: &BTreeSet<Table>) {
        for table in tables {
            let outcome = match table {
                Table::Jobs => self.source.fetch_jobs().map(|jobs| self.snapshot.jobs = jobs),
                Table::JobApplications => self
                    .source
                    .fetch_applications()
                    .map(|applications| self.snapshot.applications = applications),
                Table::Articles => self
                    .source
                    .fetch_articles()
                    .map(|articles| self.snapshot.articles = articles),
            };

            match outcome {
                Ok(()) => {
                    self.snapshot.errors.remove(table.name());
                }
                Err(error) => {
                    tracing::warn!(table = table.name(), error = %error, "admin collection refresh failed");
                    self.snapshot.errors.insert(table.name(), error.to_string());
                }
            }
        }

        self.snapshot.generation += 1;
        self.snapshot.refreshed_at = Some(Utc::now());
        tracing::debug!(
            generation = self.snapshot.generation,
            tables = tables.len(),
            failed = self.snapshot.errors.len(),
            "admin snapshot refreshed"
        );
        self.publisher.send_replace(self.snapshot.clone());
    }
}

async fn next_change(
    changes: &mut Option<broadcast::Receiver<TableChange>>,
) -> Result<TableChange, RecvError> {
    match changes {
        Some(receiver) => receiver.recv().await,
        None => future::pending().await,
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}
