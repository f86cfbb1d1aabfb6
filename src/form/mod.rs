//! Questionnaire flow: step order, validation, resume shortcuts and the
//! final commit.

pub mod answers;
pub mod assembler;
pub mod machine;
pub mod prompts;
pub mod state;
pub mod validate;

pub use answers::{Answer, SessionAnswers};
pub use assembler::{CommitError, ProfileAssembler};
pub use machine::{FormRun, FormStateMachine, Step, StepOutcome};
pub use state::FormState;
pub use validate::{best_photo, Rejection, Validator};
