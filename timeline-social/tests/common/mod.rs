#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::sync::Mutex;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use timeline_common::Post;
use timeline_common::observability::{LogConfig, init_logging};
use timeline_social::{SocialError, TimelineSource};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "timeline-tests",
            emit_stderr: true,
            default_filter: "debug",
            ..LogConfig::default()
        };
        init_logging(config).unwrap_or_default()
    });
}

/// Posts with ids `first_id, first_id - 1, ...`, one hour apart, newest first.
pub fn posts_descending(first_id: u64, n: usize) -> Vec<Post> {
    let start = Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap();
    (0..n as u64)
        .map(|i| {
            let id = first_id - i;
            Post::new(id, start - Duration::hours(i as i64), format!("post {id}"))
        })
        .collect()
}

/// Hands out pre-built pages in order, then empty pages.
pub struct ScriptedSource {
    pages: Mutex<Vec<Vec<Post>>>,
    pub calls: AtomicUsize,
    pub bounds: Mutex<Vec<Option<u64>>>,
}

impl ScriptedSource {
    pub fn new(mut pages: Vec<Vec<Post>>) -> Self {
        pages.reverse();
        Self {
            pages: Mutex::new(pages),
            calls: AtomicUsize::new(0),
            bounds: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TimelineSource for ScriptedSource {
    async fn fetch_page(
        &self,
        _account: &str,
        _page_size: u32,
        before_id: Option<u64>,
    ) -> Result<Vec<Post>, SocialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bounds.lock().unwrap().push(before_id);
        Ok(self.pages.lock().unwrap().pop().unwrap_or_default())
    }
}

/// Honors the exclusive bound over a fixed archive and, like Twitter,
/// stops serving once `cap` posts have been handed out in total.
pub struct ArchiveSource {
    archive: Vec<Post>,
    cap: usize,
    served: AtomicUsize,
    pub calls: AtomicUsize,
}

impl ArchiveSource {
    pub fn new(archive: Vec<Post>, cap: usize) -> Self {
        Self {
            archive,
            cap,
            served: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TimelineSource for ArchiveSource {
    async fn fetch_page(
        &self,
        _account: &str,
        page_size: u32,
        before_id: Option<u64>,
    ) -> Result<Vec<Post>, SocialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let served = self.served.load(Ordering::SeqCst);
        let room = self.cap.saturating_sub(served).min(page_size as usize);
        let page: Vec<Post> = self
            .archive
            .iter()
            .filter(|p| before_id.is_none_or(|b| p.id < b))
            .take(room)
            .cloned()
            .collect();
        self.served.fetch_add(page.len(), Ordering::SeqCst);
        Ok(page)
    }
}
