use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use teloxide::types::ChatId;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::context::SessionContext;
use crate::language::Language;

struct Slot {
    session: Arc<Mutex<SessionContext>>,
    last_used: Instant,
}

/// All chat sessions, created on first use.
///
/// Each session sits behind its own lock. Handlers hold it for the whole
/// operation, so a new question can never land in the middle of a
/// translation pass for the same chat.
#[derive(Clone, Default)]
pub struct Sessions {
    inner: Arc<Mutex<HashMap<ChatId, Slot>>>,
    default_language: Language,
}

impl Sessions {
    pub fn new(default_language: Language) -> Self {
        Self {
            inner: Arc::default(),
            default_language,
        }
    }

    pub async fn get(&self, chat_id: ChatId) -> Arc<Mutex<SessionContext>> {
        let mut map = self.inner.lock().await;
        let slot = map.entry(chat_id).or_insert_with(|| {
            tracing::debug!(chat_id = chat_id.0, "creating session");
            Slot {
                session: Arc::new(Mutex::new(SessionContext::new(self.default_language))),
                last_used: Instant::now(),
            }
        });
        slot.last_used = Instant::now();
        slot.session.clone()
    }

    /// Forget a chat entirely. The next update starts from a fresh session.
    pub async fn remove(&self, chat_id: ChatId) -> bool {
        self.inner.lock().await.remove(&chat_id).is_some()
    }

    /// Drop sessions unused for at least `max_idle` that no handler holds.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut map = self.inner.lock().await;
        let before = map.len();
        map.retain(|_, slot| {
            slot.last_used.elapsed() < max_idle || Arc::strong_count(&slot.session) > 1
        });
        let evicted = before - map.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = map.len(), "Evicted idle sessions");
        }
        evicted
    }

    /// Periodically evict sessions idle for longer than `max_idle`.
    pub fn spawn_eviction(&self, max_idle: Duration) -> tokio::task::JoinHandle<()> {
        let sessions = self.clone();
        let period = (max_idle / 4).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                sessions.evict_idle(max_idle).await;
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sessions_are_per_chat() {
        let sessions = Sessions::new(Language::Hindi);
        let a = sessions.get(ChatId(1)).await;
        let b = sessions.get(ChatId(2)).await;
        a.lock().await.set_language(Language::Tamil);

        assert_eq!(b.lock().await.language(), Language::Hindi);
        let again = sessions.get(ChatId(1)).await;
        assert_eq!(again.lock().await.language(), Language::Tamil);
        assert_eq!(sessions.len().await, 2);
    }

    #[tokio::test]
    async fn removed_chat_starts_fresh() {
        let sessions = Sessions::new(Language::English);
        sessions
            .get(ChatId(1))
            .await
            .lock()
            .await
            .set_language(Language::Urdu);
        assert!(sessions.remove(ChatId(1)).await);
        assert!(sessions.is_empty().await);
        assert!(!sessions.remove(ChatId(1)).await);

        let fresh = sessions.get(ChatId(1)).await;
        assert_eq!(fresh.lock().await.language(), Language::English);
    }

    #[tokio::test]
    async fn eviction_skips_sessions_in_use() {
        let sessions = Sessions::new(Language::English);
        let held = sessions.get(ChatId(1)).await;
        drop(sessions.get(ChatId(2)).await);

        assert_eq!(sessions.evict_idle(Duration::from_secs(3600)).await, 0);
        assert_eq!(sessions.evict_idle(Duration::ZERO).await, 1);
        assert_eq!(sessions.len().await, 1);
        drop(held);
        assert_eq!(sessions.evict_idle(Duration::ZERO).await, 1);
        assert!(sessions.is_empty().await);
    }
}
