//! Per-user dispatcher between the chat transport and the questionnaire.

use std::collections::HashMap;

use anyhow::Result;

use crate::config::{self, AppConfig};
use crate::form::{FormRun, FormState, FormStateMachine};
use crate::profiles::{ProfileStore, UserId};

use super::commands::profile::ProfileCommandBridge;
use super::message::{Prompt, PromptSink, ReplyContent, UserReply};

pub const START_COMMAND: &str = "/start";
pub const CANCEL_COMMAND: &str = "/cancel";
pub const CREATE_PROFILE: &str = "Create profile";
pub const MY_PROFILE: &str = "My profile";

/// Owns the profile store and every user's active run.
pub struct ChatSession {
    config: AppConfig,
    store: ProfileStore,
    runs: HashMap<UserId, FormRun>,
}

impl ChatSession {
    /// Loads the install configuration and opens its profile table.
    pub fn new() -> Result<Self> {
        let config = config::load_or_default()?;
        let store = ProfileStore::open(&config.store)?;
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: AppConfig, store: ProfileStore) -> Self {
        Self {
            config,
            store,
            runs: HashMap::new(),
        }
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Current questionnaire state for the user, if a run is active.
    pub fn active_state(&self, user_id: &UserId) -> Option<FormState> {
        self.runs.get(user_id).map(FormRun::state)
    }

    /// Processes one reply to completion and emits the resulting prompts.
    pub fn handle(&mut self, reply: &UserReply, sink: &mut dyn PromptSink) -> Result<()> {
        let prompts = self.dispatch(reply);
        for prompt in prompts {
            sink.emit(prompt)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, reply: &UserReply) -> Vec<Prompt> {
        let user_id = &reply.user_id;
        if let ReplyContent::Text(text) = &reply.content {
            let command = text.trim();
            if command.eq_ignore_ascii_case(START_COMMAND) {
                return vec![welcome()];
            }
            if command.eq_ignore_ascii_case(CANCEL_COMMAND) {
                return self.cancel(user_id);
            }
            // Menu labels are plain answers while a question is open.
            let menu_open = self
                .active_state(user_id)
                .map_or(true, |state| !state.is_question());
            if menu_open && command.eq_ignore_ascii_case(CREATE_PROFILE) {
                return self.start_run(user_id);
            }
            if menu_open && command.eq_ignore_ascii_case(MY_PROFILE) {
                return ProfileCommandBridge::new(&self.store).my_profile(user_id);
            }
        }

        let Some(run) = self.runs.get_mut(user_id) else {
            return match reply.content {
                ReplyContent::Text(_) => vec![welcome()],
                ReplyContent::Photo(_) => Vec::new(),
            };
        };
        let machine = FormStateMachine::new(
            &self.store,
            &self.config.validation,
            self.config.store.persist_policy,
        );
        let step = machine.handle(user_id, run, &reply.content);
        if run.is_finished() {
            self.runs.remove(user_id);
        }
        step.prompts
    }

    fn start_run(&mut self, user_id: &UserId) -> Vec<Prompt> {
        let machine = FormStateMachine::new(
            &self.store,
            &self.config.validation,
            self.config.store.persist_policy,
        );
        let (run, prompts) = machine.start(user_id);
        if let Some(previous) = self.runs.insert(user_id.clone(), run) {
            tracing::info!(
                user_id = %user_id,
                run_id = %previous.answers().run_id(),
                "previous questionnaire replaced"
            );
        }
        prompts
    }

    fn cancel(&mut self, user_id: &UserId) -> Vec<Prompt> {
        match self.runs.remove(user_id) {
            Some(run) => {
                tracing::info!(
                    user_id = %user_id,
                    run_id = %run.answers().run_id(),
                    state = ?run.state(),
                    "questionnaire abandoned"
                );
                vec![Prompt::text(
                    "Questionnaire cancelled. Your saved answers are kept for next time.",
                )
                .with_quick_replies([CREATE_PROFILE, MY_PROFILE])]
            }
            None => vec![welcome()],
        }
    }
}

fn welcome() -> Prompt {
    Prompt::text("Hi! I'll help you create your profile.\nChoose an action:")
        .with_quick_replies([CREATE_PROFILE, MY_PROFILE])
}
