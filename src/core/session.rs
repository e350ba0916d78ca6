use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Candidate, SwipeDirection, SwipeFilter, SwipeOutcome};

/// Operations a swipe session needs from the server side: candidate pool
/// resolution and swipe recording. Implemented by the PostgreSQL store and
/// by in-memory stand-ins in tests.
#[async_trait]
pub trait SwipeBackend {
    async fn resolve(
        &self,
        requester_id: i32,
        filter: &SwipeFilter,
    ) -> Result<Vec<Candidate>, AppError>;

    async fn record(
        &self,
        actor_id: i32,
        candidate_id: i32,
        direction: SwipeDirection,
    ) -> Result<SwipeOutcome, AppError>;
}

/// Lifecycle state of a swipe session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Ready,
    Exhausted,
}

/// A cursor over a candidate sequence materialized once per `start`.
///
/// The session is a value object owned by exactly one client context; it is
/// never shared between callers. `decide` takes `&mut self`, so a second
/// decision for the same cursor position cannot be issued while one is in
/// flight — exclusive ownership is the serialization the state machine
/// requires. The cursor only advances after the recorder reports success,
/// so an abandoned in-flight decision leaves the session where it was.
#[derive(Debug)]
pub struct SwipeSession {
    actor_id: i32,
    candidates: Vec<Candidate>,
    cursor: usize,
    state: SessionState,
}

impl SwipeSession {
    /// Create a session that has not yet fetched candidates.
    pub fn new(actor_id: i32) -> Self {
        Self {
            actor_id,
            candidates: Vec::new(),
            cursor: 0,
            state: SessionState::Loading,
        }
    }

    pub fn actor_id(&self) -> i32 {
        self.actor_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Candidates not yet presented, including the current one.
    pub fn remaining(&self) -> usize {
        self.candidates.len().saturating_sub(self.cursor)
    }

    /// Resolve the pool and position the cursor at the first candidate.
    ///
    /// On resolver failure the session stays in `Loading` and the cursor is
    /// untouched; the caller may call `start` again.
    pub async fn start<B: SwipeBackend>(
        &mut self,
        backend: &B,
        filter: &SwipeFilter,
    ) -> Result<(), AppError> {
        self.state = SessionState::Loading;
        let candidates = backend.resolve(self.actor_id, filter).await?;

        self.cursor = 0;
        self.state = if candidates.is_empty() {
            SessionState::Exhausted
        } else {
            SessionState::Ready
        };
        self.candidates = candidates;
        Ok(())
    }

    /// Discard the stale cursor and re-resolve. The only re-fetch path; the
    /// session never re-queries on its own.
    pub async fn restart<B: SwipeBackend>(
        &mut self,
        backend: &B,
        filter: &SwipeFilter,
    ) -> Result<(), AppError> {
        self.start(backend, filter).await
    }

    /// The candidate under the cursor, or `None` once exhausted.
    pub fn current(&self) -> Option<&Candidate> {
        match self.state {
            SessionState::Ready => self.candidates.get(self.cursor),
            _ => None,
        }
    }

    /// Record a decision for the current candidate and advance on success.
    ///
    /// On any recorder failure (duplicate, not-found, storage, network) the
    /// cursor stays on the same candidate and the session remains `Ready`,
    /// so the caller can retry or `skip` manually.
    pub async fn decide<B: SwipeBackend>(
        &mut self,
        backend: &B,
        direction: SwipeDirection,
    ) -> Result<SwipeOutcome, AppError> {
        let candidate_id = match self.current() {
            Some(c) => c.id,
            None => {
                return Err(AppError::Validation(
                    "Session has no current candidate".to_string(),
                ));
            }
        };

        let outcome = backend
            .record(self.actor_id, candidate_id, direction)
            .await?;

        self.advance();
        Ok(outcome)
    }

    /// Advance past the current candidate without recording anything.
    /// Returns the new current candidate. Used when the caller chooses to
    /// move on after a duplicate-swipe notice or a vanished candidate.
    pub fn skip(&mut self) -> Option<&Candidate> {
        if self.state == SessionState::Ready {
            self.advance();
        }
        self.current()
    }

    fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor >= self.candidates.len() {
            self.state = SessionState::Exhausted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn candidate(id: i32) -> Candidate {
        Candidate {
            id,
            name: format!("User {}", id),
            gender: Gender::Female,
            age: 25,
            location: None,
            bio: None,
            tags: vec![],
            photo_url: None,
        }
    }

    /// Backend with a scripted pool; `record` fails for ids in `fail_ids`.
    struct StubBackend {
        pool: Vec<Candidate>,
        fail_ids: Vec<i32>,
        records: AtomicUsize,
    }

    impl StubBackend {
        fn with_pool(ids: &[i32]) -> Self {
            Self {
                pool: ids.iter().map(|&id| candidate(id)).collect(),
                fail_ids: vec![],
                records: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SwipeBackend for StubBackend {
        async fn resolve(
            &self,
            _requester_id: i32,
            _filter: &SwipeFilter,
        ) -> Result<Vec<Candidate>, AppError> {
            Ok(self.pool.clone())
        }

        async fn record(
            &self,
            actor_id: i32,
            candidate_id: i32,
            direction: SwipeDirection,
        ) -> Result<SwipeOutcome, AppError> {
            if self.fail_ids.contains(&candidate_id) {
                return Err(AppError::Network("connection reset".to_string()));
            }
            let n = self.records.fetch_add(1, Ordering::SeqCst);
            Ok(SwipeOutcome {
                swipe: crate::models::Swipe {
                    id: n as i32 + 1,
                    actor_id,
                    candidate_id,
                    direction,
                    swiped_at: chrono::Utc::now(),
                },
                match_formed: false,
            })
        }
    }

    #[tokio::test]
    async fn test_start_empty_pool_exhausts() {
        let backend = StubBackend::with_pool(&[]);
        let mut session = SwipeSession::new(1);

        session.start(&backend, &SwipeFilter::default()).await.unwrap();

        assert_eq!(session.state(), SessionState::Exhausted);
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn test_decide_advances_through_pool() {
        let backend = StubBackend::with_pool(&[10, 11]);
        let mut session = SwipeSession::new(1);
        session.start(&backend, &SwipeFilter::default()).await.unwrap();

        assert_eq!(session.current().unwrap().id, 10);
        session
            .decide(&backend, SwipeDirection::Left)
            .await
            .unwrap();
        assert_eq!(session.current().unwrap().id, 11);
        session
            .decide(&backend, SwipeDirection::Right)
            .await
            .unwrap();

        assert_eq!(session.state(), SessionState::Exhausted);
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn test_decide_on_exhausted_session_rejected() {
        let backend = StubBackend::with_pool(&[]);
        let mut session = SwipeSession::new(1);
        session.start(&backend, &SwipeFilter::default()).await.unwrap();

        let result = session.decide(&backend, SwipeDirection::Left).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_failed_record_leaves_cursor() {
        let mut backend = StubBackend::with_pool(&[10, 11]);
        backend.fail_ids = vec![10];
        let mut session = SwipeSession::new(1);
        session.start(&backend, &SwipeFilter::default()).await.unwrap();

        let result = session.decide(&backend, SwipeDirection::Right).await;
        assert!(matches!(result, Err(AppError::Network(_))));

        // Still on the same candidate, still Ready
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.current().unwrap().id, 10);

        // The caller may skip manually
        assert_eq!(session.skip().unwrap().id, 11);
    }

    #[tokio::test]
    async fn test_restart_resets_cursor() {
        let backend = StubBackend::with_pool(&[10, 11, 12]);
        let mut session = SwipeSession::new(1);
        session.start(&backend, &SwipeFilter::default()).await.unwrap();
        session
            .decide(&backend, SwipeDirection::Left)
            .await
            .unwrap();
        assert_eq!(session.current().unwrap().id, 11);

        session
            .restart(&backend, &SwipeFilter::default())
            .await
            .unwrap();
        assert_eq!(session.current().unwrap().id, 10);
        assert_eq!(session.remaining(), 3);
    }
}
