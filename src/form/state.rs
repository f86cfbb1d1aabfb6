use serde::{Deserialize, Serialize};

use crate::profiles::ProfileField;

/// Questionnaire steps in the order they are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    Name,
    Age,
    City,
    Description,
    Photo,
    Review,
    Committed,
}

impl FormState {
    pub fn next(self) -> FormState {
        match self {
            FormState::Name => FormState::Age,
            FormState::Age => FormState::City,
            FormState::City => FormState::Description,
            FormState::Description => FormState::Photo,
            FormState::Photo => FormState::Review,
            FormState::Review => FormState::Committed,
            FormState::Committed => FormState::Committed,
        }
    }

    /// The profile field answered in this state, if it asks a question.
    pub fn field(self) -> Option<ProfileField> {
        match self {
            FormState::Name => Some(ProfileField::Name),
            FormState::Age => Some(ProfileField::Age),
            FormState::City => Some(ProfileField::City),
            FormState::Description => Some(ProfileField::Description),
            FormState::Photo => Some(ProfileField::Photo),
            FormState::Review | FormState::Committed => None,
        }
    }

    pub fn asking(field: ProfileField) -> FormState {
        match field {
            ProfileField::Name => FormState::Name,
            ProfileField::Age => FormState::Age,
            ProfileField::City => FormState::City,
            ProfileField::Description => FormState::Description,
            ProfileField::Photo => FormState::Photo,
        }
    }

    pub fn is_question(self) -> bool {
        self.field().is_some()
    }
}
