//! Questionnaire state machine.
//!
//! [`FormRun`] is the volatile per-conversation state; [`FormStateMachine`]
//! borrows the store and settings for the duration of one reply and moves a
//! run from one state to the next.

use crate::chat::{Prompt, ReplyContent};
use crate::config::{PersistPolicy, ValidationSettings};
use crate::profiles::{Description, Profile, ProfileField, ProfileStore, UserId};

use super::answers::{Answer, SessionAnswers};
use super::assembler::{CommitError, ProfileAssembler};
use super::prompts;
use super::state::FormState;
use super::validate::{best_photo, Rejection, Validator};

/// One user's active run through the questionnaire.
#[derive(Debug, Clone)]
pub struct FormRun {
    state: FormState,
    answers: SessionAnswers,
    /// Set when a field was reopened from the review step.
    editing: bool,
}

impl FormRun {
    pub fn new() -> Self {
        Self {
            state: FormState::Name,
            answers: SessionAnswers::new(),
            editing: false,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn answers(&self) -> &SessionAnswers {
        &self.answers
    }

    pub fn is_finished(&self) -> bool {
        self.state == FormState::Committed
    }
}

impl Default for FormRun {
    fn default() -> Self {
        Self::new()
    }
}

/// What handling a reply did to the run.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The answer was accepted and the run moved to this state.
    Advanced(FormState),
    /// The answer failed validation; the state is unchanged.
    Rejected(Rejection),
    /// The reply does not apply to the current state.
    Ignored,
    /// The answer was valid but could not be persisted.
    PersistFailed,
    /// Review options or the edit menu were shown again.
    Reviewing,
    /// The current question was asked again without the stored value.
    Reasked,
    Committed(Profile),
    CommitFailed(CommitError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub outcome: StepOutcome,
    pub prompts: Vec<Prompt>,
}

impl Step {
    fn new(outcome: StepOutcome, prompts: Vec<Prompt>) -> Self {
        Self { outcome, prompts }
    }

    fn ignored() -> Self {
        Self::new(StepOutcome::Ignored, Vec::new())
    }
}

enum ReviewAction {
    Confirm,
    ShowEditMenu,
    Edit(ProfileField),
}

pub struct FormStateMachine<'a> {
    store: &'a ProfileStore,
    validation: &'a ValidationSettings,
    persist: PersistPolicy,
}

impl<'a> FormStateMachine<'a> {
    pub fn new(
        store: &'a ProfileStore,
        validation: &'a ValidationSettings,
        persist: PersistPolicy,
    ) -> Self {
        Self {
            store,
            validation,
            persist,
        }
    }

    /// Starts a fresh run at the name question.
    pub fn start(&self, user_id: &UserId) -> (FormRun, Vec<Prompt>) {
        let mut run = FormRun::new();
        tracing::info!(user_id = %user_id, run_id = %run.answers.run_id(), "questionnaire started");
        let prompts = self.enter(user_id, &mut run, FormState::Name);
        (run, prompts)
    }

    /// Moves the run to `state` and returns that state's prompts. Name, age
    /// and city offer the stored value as a quick reply.
    pub fn enter(&self, user_id: &UserId, run: &mut FormRun, state: FormState) -> Vec<Prompt> {
        run.state = state;
        match state {
            FormState::Name => {
                let stored = self.store.load(user_id);
                vec![prompts::ask_name(stored.name.as_deref())]
            }
            FormState::Age => {
                let stored = self.store.load(user_id);
                vec![prompts::ask_age(
                    self.validation.age_min,
                    self.validation.age_max,
                    stored.age,
                )]
            }
            FormState::City => {
                let stored = self.store.load(user_id);
                vec![prompts::ask_city(
                    stored.city.as_ref(),
                    &self.validation.skip_keyword,
                )]
            }
            FormState::Description => vec![prompts::ask_description(
                self.validation.description_min_chars,
                &self.validation.skip_keyword,
            )],
            FormState::Photo => vec![prompts::ask_photo()],
            FormState::Review => {
                run.editing = false;
                let preview = ProfileAssembler::new(self.store).preview(user_id, &run.answers);
                vec![prompts::profile_card(&preview), prompts::review_question()]
            }
            FormState::Committed => Vec::new(),
        }
    }

    /// Handles one reply for the run's current state.
    pub fn handle(&self, user_id: &UserId, run: &mut FormRun, content: &ReplyContent) -> Step {
        let step = match (run.state, content) {
            (FormState::Photo, ReplyContent::Photo(variants)) => match best_photo(variants) {
                Some(best) => self.accept(user_id, run, Answer::Photo(best.photo_ref.clone())),
                None => Step::ignored(),
            },
            (FormState::Review, ReplyContent::Text(text)) => self.review(user_id, run, text),
            (state, ReplyContent::Text(text)) if state.is_question() => {
                self.answer(user_id, run, text)
            }
            _ => Step::ignored(),
        };
        tracing::debug!(
            user_id = %user_id,
            run_id = %run.answers.run_id(),
            state = ?run.state,
            outcome = ?step.outcome,
            "reply handled"
        );
        step
    }

    fn answer(&self, user_id: &UserId, run: &mut FormRun, text: &str) -> Step {
        let validator = Validator::new(self.validation);
        let answer = match run.state {
            FormState::Name if text.trim().eq_ignore_ascii_case(prompts::CHANGE_NAME) => {
                return Step::new(StepOutcome::Reasked, vec![prompts::ask_name(None)]);
            }
            FormState::Name => validator.name(text).map(Answer::Name),
            FormState::Age => {
                if let Some(age) = self.reused_age(user_id, text) {
                    run.answers.record(&Answer::Age(age));
                    let next = self.next_state(user_id, run);
                    let prompts = self.enter(user_id, run, next);
                    return Step::new(StepOutcome::Advanced(next), prompts);
                }
                validator.age(text).map(Answer::Age)
            }
            FormState::City => validator.city(text).map(Answer::City),
            FormState::Description => validator.description(text).map(Answer::Description),
            _ => return Step::ignored(),
        };
        match answer {
            Ok(answer) => self.accept(user_id, run, answer),
            Err(rejection) => {
                let prompt = Prompt::text(rejection.message());
                Step::new(StepOutcome::Rejected(rejection), vec![prompt])
            }
        }
    }

    /// The stored age, when the reply repeats it exactly.
    fn reused_age(&self, user_id: &UserId, text: &str) -> Option<u8> {
        self.store
            .load(user_id)
            .age
            .filter(|age| age.to_string() == text)
    }

    fn accept(&self, user_id: &UserId, run: &mut FormRun, answer: Answer) -> Step {
        if self.persist == PersistPolicy::Immediate
            && !self.store.save(user_id, &answer.to_partial())
        {
            return Step::new(StepOutcome::PersistFailed, vec![prompts::save_failed()]);
        }
        run.answers.record(&answer);

        let mut out = match &answer {
            Answer::Name(name) => vec![prompts::name_accepted(name)],
            Answer::Description(description) => {
                vec![prompts::description_saved(
                    *description == Description::Skipped,
                )]
            }
            _ => Vec::new(),
        };
        let next = self.next_state(user_id, run);
        out.extend(self.enter(user_id, run, next));
        Step::new(StepOutcome::Advanced(next), out)
    }

    /// Forward by one, or straight back to review after an edit once every
    /// required field is present.
    fn next_state(&self, user_id: &UserId, run: &FormRun) -> FormState {
        if run.editing {
            let preview = ProfileAssembler::new(self.store).preview(user_id, &run.answers);
            if preview.missing_required().is_empty() {
                return FormState::Review;
            }
        }
        run.state.next()
    }

    fn review(&self, user_id: &UserId, run: &mut FormRun, text: &str) -> Step {
        match parse_review_action(text) {
            Some(ReviewAction::Confirm) => self.commit(user_id, run),
            Some(ReviewAction::ShowEditMenu) => {
                Step::new(StepOutcome::Reviewing, vec![prompts::edit_menu()])
            }
            Some(ReviewAction::Edit(field)) => {
                let state = FormState::asking(field);
                let prompts = self.enter(user_id, run, state);
                run.editing = true;
                Step::new(StepOutcome::Advanced(state), prompts)
            }
            None => Step::new(StepOutcome::Reviewing, vec![prompts::review_hint()]),
        }
    }

    fn commit(&self, user_id: &UserId, run: &mut FormRun) -> Step {
        match ProfileAssembler::new(self.store).commit(user_id, &run.answers) {
            Ok(profile) => {
                run.state = FormState::Committed;
                Step::new(StepOutcome::Committed(profile), vec![prompts::committed()])
            }
            Err(err) => {
                let prompt = match &err {
                    CommitError::Incomplete { missing } => prompts::incomplete(missing),
                    CommitError::Store(_) => prompts::commit_failed(),
                };
                Step::new(StepOutcome::CommitFailed(err), vec![prompt])
            }
        }
    }
}

fn parse_review_action(text: &str) -> Option<ReviewAction> {
    let text = text.trim();
    if text.eq_ignore_ascii_case(prompts::DONE) || text.eq_ignore_ascii_case("confirm") {
        return Some(ReviewAction::Confirm);
    }
    if text.eq_ignore_ascii_case(prompts::EDIT_PROFILE) {
        return Some(ReviewAction::ShowEditMenu);
    }
    ProfileField::ALL
        .into_iter()
        .find(|field| text.eq_ignore_ascii_case(prompts::edit_label(*field)))
        .map(ReviewAction::Edit)
}
