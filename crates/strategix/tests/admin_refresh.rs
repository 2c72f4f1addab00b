//! The admin refresh loop wired to the in-memory store's change feed.

use std::sync::Arc;
use std::time::Duration;

use strategix::admin::{AdminService, AdminSnapshot, AdminTab, RefreshCoordinator, RefreshHandle};
use strategix::careers::{JobDraft, LocationCountry};
use strategix::config::RefreshConfig;
use strategix::insights::ArticleDraft;
use strategix::store::{ChangeFeed, InMemoryStore};

fn config() -> RefreshConfig {
    RefreshConfig {
        interval: Duration::from_secs(30),
        debounce: Duration::from_millis(250),
    }
}

fn draft(title: &str) -> JobDraft {
    JobDraft {
        title: title.to_string(),
        department: "Security".to_string(),
        location: "Pune".to_string(),
        location_country: LocationCountry::India,
        employment_type: "Contract".to_string(),
        description: "Harden client estates.".to_string(),
        full_description: None,
        requirements: Vec::new(),
        responsibilities: Vec::new(),
        salary_range: None,
        is_active: true,
    }
}

async fn wait_for(
    handle: &RefreshHandle,
    predicate: impl FnMut(&AdminSnapshot) -> bool,
) -> AdminSnapshot {
    let mut receiver = handle.subscribe();
    let snapshot = receiver
        .wait_for(predicate)
        .await
        .expect("refresh loop running")
        .clone();
    snapshot
}

fn spawn(store: &Arc<InMemoryStore>) -> (Arc<AdminService<InMemoryStore>>, RefreshHandle) {
    let service = Arc::new(AdminService::new(store.clone()));
    let handle = RefreshCoordinator::spawn(
        service.clone(),
        Some(store.subscribe_changes()),
        config(),
    );
    (service, handle)
}

#[tokio::test(start_paused = true)]
async fn store_mutations_reach_the_snapshot() {
    let store = Arc::new(InMemoryStore::new());
    let (service, handle) = spawn(&store);
    wait_for(&handle, |snapshot| snapshot.generation >= 1).await;

    service.create_job(draft("Security Analyst")).expect("created");
    let snapshot = wait_for(&handle, |snapshot| !snapshot.jobs.is_empty()).await;
    assert_eq!(snapshot.jobs[0].title, "Security Analyst");
    assert_eq!(snapshot.generation, 2);
}

#[tokio::test(start_paused = true)]
async fn a_burst_of_writes_lands_in_one_pass() {
    let store = Arc::new(InMemoryStore::new());
    let (service, handle) = spawn(&store);
    wait_for(&handle, |snapshot| snapshot.generation >= 1).await;

    for title in ["Red Team Lead", "SOC Analyst", "GRC Consultant"] {
        service.create_job(draft(title)).expect("created");
    }
    service
        .create_article(ArticleDraft {
            title: "Zero Trust in Practice".to_string(),
            ..ArticleDraft::default()
        })
        .expect("created");

    let snapshot = wait_for(&handle, |snapshot| snapshot.generation >= 2).await;
    assert_eq!(snapshot.jobs.len(), 3);
    assert_eq!(snapshot.articles.len(), 1);
    assert_eq!(handle.snapshot().generation, 2);
}

#[tokio::test(start_paused = true)]
async fn tab_switch_is_reflected_in_the_snapshot() {
    let store = Arc::new(InMemoryStore::new());
    let (_service, handle) = spawn(&store);
    wait_for(&handle, |snapshot| snapshot.generation >= 1).await;

    handle.switch_tab(AdminTab::Jobs).await.expect("loop running");
    let snapshot = wait_for(&handle, |snapshot| snapshot.generation >= 2).await;
    assert_eq!(snapshot.active_tab, AdminTab::Jobs);
    assert!(snapshot.errors.is_empty());
}
