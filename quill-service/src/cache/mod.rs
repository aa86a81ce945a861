/// Landing page cache
///
/// The site-wide listing caches its fully rendered body for a short window
/// to keep the hottest page off the database. Entries are keyed by the
/// requested URL (path plus query, so each page number caches separately)
/// and the whole cache is invalidated when a post is created.
use moka::future::Cache;
use std::time::Duration;

#[derive(Clone)]
pub struct PageCache {
    inner: Cache<String, String>,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(256)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).await
    }

    pub async fn insert(&self, key: String, body: String) {
        self.inner.insert(key, body).await;
    }

    /// Drop every cached page. Called when a new post is created so the
    /// landing page never serves a stale listing past a write.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn caches_and_returns_bodies() {
        let cache = PageCache::new(Duration::from_secs(20));
        cache.insert("/?page=1".to_string(), "<html>1</html>".to_string()).await;

        assert_eq!(
            cache.get("/?page=1").await.as_deref(),
            Some("<html>1</html>")
        );
        assert_eq!(cache.get("/?page=2").await, None);
    }

    #[tokio::test]
    async fn invalidate_all_clears_entries() {
        let cache = PageCache::new(Duration::from_secs(20));
        cache.insert("/".to_string(), "stale".to_string()).await;
        cache.invalidate_all();

        assert_eq!(cache.get("/").await, None);
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = PageCache::new(Duration::from_millis(50));
        cache.insert("/".to_string(), "body".to_string()).await;
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(cache.get("/").await, None);
    }
}
