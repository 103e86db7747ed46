use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::extract::FromRef;
use tokio::{sync::RwLock, task::JoinHandle, time::MissedTickBehavior};
use uuid::Uuid;

use crate::{
    config::Config,
    error::AppError,
    models::session::Session,
    services::{
        cache::MemoCache, generation::Generator, openai::CompletionBackend, pdf::PdfExtractor,
    },
};

/// In-memory sessions, one per active user interaction.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub async fn create(&self) -> Session {
        let session = Session::new();
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        session
    }

    /// Runs `f` against a read-only view of the session.
    pub async fn read<R>(&self, id: Uuid, f: impl FnOnce(&Session) -> R) -> Result<R, AppError> {
        let sessions = self.sessions.read().await;
        sessions.get(&id).map(f).ok_or_else(|| not_found(id))
    }

    /// Runs `f` with exclusive access to the session and marks it active.
    pub async fn update<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        session.touch();
        f(session)
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    /// Drops sessions with no activity for `ttl`. Returns how many were removed.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_active.elapsed() < ttl);
        before - sessions.len()
    }

    /// Runs [`evict_idle`](Self::evict_idle) every `every` until the runtime stops.
    pub fn spawn_sweeper(&self, ttl: Duration, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(ttl).await;
                if evicted > 0 {
                    tracing::info!("Evicted {} idle sessions", evicted);
                }
            }
        })
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {} not found", id))
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub generator: Generator,
    pub extractor: PdfExtractor,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn CompletionBackend>) -> Self {
        let completions = config
            .cache_generations
            .then(|| MemoCache::with_capacity(config.cache_capacity));
        let generator = Generator::new(backend, completions);
        let extractor = PdfExtractor::with_capacity(config.cache_capacity);
        Self {
            config,
            sessions: SessionStore::default(),
            generator,
            extractor,
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Generator {
    fn from_ref(state: &AppState) -> Self {
        state.generator.clone()
    }
}

impl FromRef<AppState> for PdfExtractor {
    fn from_ref(state: &AppState) -> Self {
        state.extractor.clone()
    }
}
