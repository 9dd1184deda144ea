use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use std::fs;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use timeline_common::{Post, PostTable};
use timeline_http::{HttpError, StatusCode};
use timeline_social::{SocialError, TimelineFetcher, TimelineSource};
use timeline_store::{CacheLoader, LoadSource, SnapshotStore, StoreError};

/// Serves `archive` below the requested bound and counts page requests.
struct FakeProvider {
    archive: Mutex<Vec<Post>>,
    calls: AtomicUsize,
}

impl FakeProvider {
    fn new(archive: Vec<Post>) -> Self {
        Self {
            archive: Mutex::new(archive),
            calls: AtomicUsize::new(0),
        }
    }

    fn replace(&self, archive: Vec<Post>) {
        *self.archive.lock().unwrap() = archive;
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TimelineSource for FakeProvider {
    async fn fetch_page(
        &self,
        _account: &str,
        page_size: u32,
        before_id: Option<u64>,
    ) -> Result<Vec<Post>, SocialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .archive
            .lock()
            .unwrap()
            .iter()
            .filter(|p| before_id.is_none_or(|b| p.id < b))
            .take(page_size as usize)
            .cloned()
            .collect())
    }
}

fn archive(first_id: u64, n: usize, tag: &str) -> Vec<Post> {
    let start = Utc.with_ymd_and_hms(2019, 11, 20, 18, 30, 0).unwrap();
    (0..n as u64)
        .map(|i| {
            let mut p = Post::new(first_id - i, start - Duration::hours(7 * i as i64), format!("{tag} {i}"));
            p.retweet_count = i % 5;
            p.favorite_count = i * 3;
            p.has_media = i % 4 == 0;
            p.extra.insert("lang".into(), json!(tag));
            if i % 3 == 0 {
                p.extra.insert("geo".into(), json!({ "lat": 52.5, "lon": 13.4 }));
            }
            p
        })
        .collect()
}

fn loader(dir: &TempDir, provider: FakeProvider) -> CacheLoader<FakeProvider> {
    let store = SnapshotStore::new(dir.path().join("tw_analysis").join("tweets_df.json"));
    CacheLoader::new(TimelineFetcher::new(provider), store)
}

fn provider_calls(loader: &CacheLoader<FakeProvider>) -> usize {
    loader.fetcher().source().calls()
}

#[tokio::test]
async fn missing_snapshot_triggers_fetch_and_persist() {
    let dir = TempDir::new().unwrap();
    let loader = loader(&dir, FakeProvider::new(archive(5_000, 250, "en")));

    let (table, source) = loader.load_with_source("someone", false).await.unwrap();

    assert_eq!(source, LoadSource::Network);
    assert_eq!(table.len(), 250);
    assert!(loader.store().exists());
    // 100 + 100 + 50 + empty
    assert_eq!(provider_calls(&loader), 4);
}

#[tokio::test]
async fn round_trip_through_snapshot_is_lossless() {
    let dir = TempDir::new().unwrap();
    let loader = loader(&dir, FakeProvider::new(archive(5_000, 120, "en")));

    let fetched = loader.load("someone", true).await.unwrap();
    let calls_after_fetch = provider_calls(&loader);
    let cached = loader.load("someone", false).await.unwrap();

    assert_eq!(cached, fetched);
    assert_eq!(cached.columns(), fetched.columns());
    assert_eq!(provider_calls(&loader), calls_after_fetch);
}

#[tokio::test]
async fn cache_hits_are_idempotent_and_offline() {
    let dir = TempDir::new().unwrap();
    let loader = loader(&dir, FakeProvider::new(archive(5_000, 30, "en")));
    loader.load("someone", false).await.unwrap();
    let calls = provider_calls(&loader);
    let on_disk = fs::read(loader.store().path()).unwrap();

    let first = loader.load("someone", false).await.unwrap();
    let second = loader.load("someone", false).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(provider_calls(&loader), calls);
    assert_eq!(fs::read(loader.store().path()).unwrap(), on_disk);
}

#[tokio::test]
async fn force_reload_overwrites_instead_of_merging() {
    let dir = TempDir::new().unwrap();
    let loader = loader(&dir, FakeProvider::new(archive(5_000, 150, "en")));
    loader.load("someone", false).await.unwrap();

    loader.fetcher().source().replace(archive(9_000, 40, "de"));
    let reloaded = loader.load("someone", true).await.unwrap();
    let cached = loader.store().load().unwrap();

    assert_eq!(reloaded.len(), 40);
    assert_eq!(cached, reloaded);
    assert!(cached.rows().iter().all(|p| p.extra["lang"] == json!("de")));
    assert!(!cached.rows().iter().any(|p| p.id <= 5_000));
}

#[tokio::test]
async fn empty_account_round_trips_as_empty_table() {
    let dir = TempDir::new().unwrap();
    let loader = loader(&dir, FakeProvider::new(Vec::new()));

    let fetched = loader.load("quiet", false).await.unwrap();
    let cached = loader.load("quiet", false).await.unwrap();

    assert!(fetched.is_empty());
    assert_eq!(cached, PostTable::from_posts(Vec::new()));
    assert_eq!(provider_calls(&loader), 1);
}

#[tokio::test]
async fn corrupt_snapshot_is_fatal() {
    let dir = TempDir::new().unwrap();
    let loader = loader(&dir, FakeProvider::new(archive(5_000, 10, "en")));
    fs::create_dir_all(loader.store().path().parent().unwrap()).unwrap();
    fs::write(loader.store().path(), b"\x80\x04not a snapshot").unwrap();

    let err = loader.load("someone", false).await.unwrap_err();

    assert!(matches!(err, StoreError::Corrupt { .. }));
    assert_eq!(provider_calls(&loader), 0);

    // a forced reload repairs it
    let repaired = loader.load("someone", true).await.unwrap();
    assert_eq!(repaired.len(), 10);
    assert_eq!(loader.store().load().unwrap(), repaired);
}

struct Unauthorized;

#[async_trait]
impl TimelineSource for Unauthorized {
    async fn fetch_page(
        &self,
        _account: &str,
        _page_size: u32,
        _before_id: Option<u64>,
    ) -> Result<Vec<Post>, SocialError> {
        Err(HttpError::Api {
            status: StatusCode::UNAUTHORIZED,
            message: "Invalid or expired token.".into(),
        }
        .into())
    }
}

#[tokio::test]
async fn auth_errors_propagate_and_leave_existing_snapshot_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tweets_df.json");
    let store = SnapshotStore::new(&path);
    let previous = PostTable::from_posts(archive(10, 3, "en"));
    store.save(&previous).unwrap();

    let loader = CacheLoader::new(TimelineFetcher::new(Unauthorized), store);
    let err = loader.load("someone", true).await.unwrap_err();

    match &err {
        StoreError::Fetch(SocialError::Http(http)) => {
            assert_eq!(http.status(), Some(StatusCode::UNAUTHORIZED));
        }
        other => panic!("expected an auth failure, got {other:?}"),
    }
    assert_eq!(loader.store().load().unwrap(), previous);
}
