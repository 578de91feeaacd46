#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use linkforge::application::services::CountingMode;
use linkforge::domain::entities::{Link, NewLink};
use linkforge::domain::repositories::{IncrementOutcome, LinkRepository};
use linkforge::error::AppError;
use linkforge::state::AppState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

pub const BASE_URL: &str = "https://lnk.test";

/// In-memory `links` table with the same uniqueness rule as the real schema.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<HashMap<String, Link>>,
    next_id: AtomicI64,
    atomic_unsupported: AtomicBool,
    store_down: AtomicBool,
    increment_gate: Mutex<Option<Arc<Semaphore>>>,
    pub find_calls: AtomicI64,
    pub increment_calls: AtomicI64,
}

impl InMemoryLinkRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes `increment_click_count` report a missing stored function.
    pub fn without_atomic_increment(self: Arc<Self>) -> Arc<Self> {
        self.atomic_unsupported.store(true, Ordering::SeqCst);
        self
    }

    /// Makes every call fail as if the database were unreachable.
    pub fn set_store_down(&self, down: bool) {
        self.store_down.store(down, Ordering::SeqCst);
    }

    /// Blocks increments until a permit is added to the returned semaphore.
    pub fn gate_increments(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.increment_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn insert(&self, owner_id: &str, short_code: &str, original_url: &str) -> Link {
        self.insert_aged(owner_id, short_code, original_url, 0, 0)
    }

    pub fn insert_aged(
        &self,
        owner_id: &str,
        short_code: &str,
        original_url: &str,
        click_count: i64,
        age_days: i64,
    ) -> Link {
        let link = Link::new(
            self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            owner_id.to_string(),
            short_code.to_string(),
            original_url.to_string(),
            click_count,
            Utc::now() - Duration::days(age_days),
        );
        self.links
            .lock()
            .unwrap()
            .insert(short_code.to_string(), link.clone());
        link
    }

    pub fn click_count(&self, short_code: &str) -> Option<i64> {
        self.links
            .lock()
            .unwrap()
            .get(short_code)
            .map(|l| l.click_count)
    }

    pub fn len(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    fn check_up(&self) -> Result<(), AppError> {
        if self.store_down.load(Ordering::SeqCst) {
            return Err(AppError::persistence("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.check_up()?;
        tokio::task::yield_now().await;

        let mut links = self.links.lock().unwrap();
        if links.contains_key(&new_link.short_code) {
            return Err(AppError::AllocationConflict(new_link.short_code));
        }

        let link = Link::new(
            self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            new_link.owner_id,
            new_link.short_code.clone(),
            new_link.original_url,
            0,
            Utc::now(),
        );
        links.insert(new_link.short_code, link.clone());
        Ok(link)
    }

    async fn exists(&self, short_code: &str) -> Result<bool, AppError> {
        self.check_up()?;
        tokio::task::yield_now().await;
        Ok(self.links.lock().unwrap().contains_key(short_code))
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, AppError> {
        self.check_up()?;
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.links.lock().unwrap().get(short_code).cloned())
    }

    async fn increment_click_count(
        &self,
        short_code: &str,
    ) -> Result<IncrementOutcome, AppError> {
        self.increment_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.increment_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map_err(|e| AppError::internal(e.to_string()))?
                .forget();
        }

        self.check_up()?;
        if self.atomic_unsupported.load(Ordering::SeqCst) {
            return Ok(IncrementOutcome::Unsupported);
        }

        match self.links.lock().unwrap().get_mut(short_code) {
            Some(link) => {
                link.click_count += 1;
                Ok(IncrementOutcome::Incremented)
            }
            None => Ok(IncrementOutcome::NotFound),
        }
    }

    async fn get_click_count(&self, short_code: &str) -> Result<Option<i64>, AppError> {
        self.check_up()?;
        Ok(self.click_count(short_code))
    }

    async fn set_click_count(&self, short_code: &str, click_count: i64) -> Result<bool, AppError> {
        self.check_up()?;
        match self.links.lock().unwrap().get_mut(short_code) {
            Some(link) => {
                link.click_count = click_count;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Link>, AppError> {
        self.check_up()?;
        let mut links: Vec<Link> = self
            .links
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(links)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_up()
    }
}

pub fn create_test_state(repo: Arc<InMemoryLinkRepository>) -> AppState {
    create_test_state_with_mode(repo, CountingMode::Lenient)
}

pub fn create_test_state_with_mode(
    repo: Arc<InMemoryLinkRepository>,
    counting_mode: CountingMode,
) -> AppState {
    let repo: Arc<dyn LinkRepository> = repo;
    AppState::new(repo, counting_mode, BASE_URL)
}

/// Polls until the stored click count reaches `expected` or a second passes.
pub async fn wait_for_clicks(repo: &InMemoryLinkRepository, short_code: &str, expected: i64) -> bool {
    for _ in 0..100 {
        if repo.click_count(short_code) == Some(expected) {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    false
}
