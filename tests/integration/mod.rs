use formbot::config::{AppConfig, CachePolicy};
use formbot::{ChatSession, ProfileStore};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct IntegrationHarness {
    workspace: TempDir,
}

impl IntegrationHarness {
    pub fn new() -> Self {
        let workspace = TempDir::new().expect("failed to create temp workspace");
        Self { workspace }
    }

    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    pub fn table_path(&self) -> PathBuf {
        self.workspace.path().join("user_profiles.json")
    }

    pub fn store(&self, policy: CachePolicy) -> ProfileStore {
        ProfileStore::new(self.table_path(), policy)
    }

    pub fn chat_session(&self, config: AppConfig) -> ChatSession {
        let store = self.store(config.store.cache_policy);
        ChatSession::with_store(config, store)
    }
}

mod questionnaire_flow;
mod resume;
mod commit;
mod store_recovery;
mod store_concurrency;
