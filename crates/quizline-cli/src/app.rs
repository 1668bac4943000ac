//! Collaborators shared by every command.

use std::sync::Arc;

use anyhow::{Context, Result};

use quizline_core::AuthSession;
use quizline_providers::config::load_config_from;
use quizline_providers::{
    FileStore, LatencyConfig, MockAuthBackend, MockQuizSource, MockResultSink, QuizlineConfig,
};

use crate::GlobalOpts;

pub struct App {
    pub config: QuizlineConfig,
    pub source: MockQuizSource,
    pub sink: Arc<MockResultSink>,
    pub auth: AuthSession,
}

impl App {
    /// Load config, apply command-line overrides, and restore the signed-in user.
    pub(crate) fn build(opts: &GlobalOpts) -> Result<Self> {
        let mut config = load_config_from(opts.config.as_deref())?;
        if let Some(store) = &opts.store {
            config.store_path = store.clone();
        }
        if opts.instant {
            config.latency = LatencyConfig::instant();
        }
        tracing::debug!(?config, "resolved config");

        let store = Arc::new(FileStore::new(&config.store_path));
        let backend = Arc::new(MockAuthBackend::new().with_latency(&config.latency));
        let auth = AuthSession::restore(store, backend).with_context(|| {
            format!("failed to restore user from {}", config.store_path.display())
        })?;

        Ok(Self {
            source: MockQuizSource::builtin().with_latency(&config.latency),
            sink: Arc::new(MockResultSink::new().with_latency(&config.latency)),
            auth,
            config,
        })
    }
}
