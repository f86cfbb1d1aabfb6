//! Final merge of session answers with the stored profile.

use chrono::Utc;
use thiserror::Error;

use crate::profiles::{Description, Profile, ProfileField, ProfileStore, UserId};

use super::answers::SessionAnswers;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommitError {
    #[error("profile is incomplete, missing {}", field_list(.missing))]
    Incomplete { missing: Vec<ProfileField> },
    #[error("failed to save profile for user {0}")]
    Store(UserId),
}

fn field_list(fields: &[ProfileField]) -> String {
    fields
        .iter()
        .map(|field| field.key())
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct ProfileAssembler<'a> {
    store: &'a ProfileStore,
}

impl<'a> ProfileAssembler<'a> {
    pub fn new(store: &'a ProfileStore) -> Self {
        Self { store }
    }

    /// Stored profile with the session answers laid over it. Nothing is saved.
    pub fn preview(&self, user_id: &UserId, answers: &SessionAnswers) -> Profile {
        let mut merged = self.store.load(user_id);
        merged.merge_from(answers.values());
        merged
    }

    /// Validates the merged profile and saves it. On error the stored record
    /// is left as it was and the commit can be retried.
    pub fn commit(
        &self,
        user_id: &UserId,
        answers: &SessionAnswers,
    ) -> Result<Profile, CommitError> {
        let mut merged = self.preview(user_id, answers);
        let missing = merged.missing_required();
        if !missing.is_empty() {
            tracing::info!(
                user_id = %user_id,
                run_id = %answers.run_id(),
                missing = %field_list(&missing),
                "commit rejected, profile incomplete"
            );
            return Err(CommitError::Incomplete { missing });
        }
        if merged.description.is_none() {
            merged.description = Some(Description::Skipped);
        }
        let now = Utc::now();
        if merged.created_at.is_none() {
            merged.created_at = Some(now);
        }
        merged.last_updated = Some(now);

        if !self.store.save(user_id, &merged) {
            return Err(CommitError::Store(user_id.clone()));
        }
        tracing::info!(user_id = %user_id, run_id = %answers.run_id(), "profile committed");
        Ok(self.store.load(user_id))
    }
}
