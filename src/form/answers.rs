//! Transient answers collected during one run through the questionnaire.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::profiles::{City, Description, PhotoRef, Profile, ProfileField};

/// A validated answer for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Name(String),
    Age(u8),
    City(City),
    Description(Description),
    Photo(PhotoRef),
}

impl Answer {
    pub fn field(&self) -> ProfileField {
        match self {
            Answer::Name(_) => ProfileField::Name,
            Answer::Age(_) => ProfileField::Age,
            Answer::City(_) => ProfileField::City,
            Answer::Description(_) => ProfileField::Description,
            Answer::Photo(_) => ProfileField::Photo,
        }
    }

    pub fn apply_to(&self, profile: &mut Profile) {
        match self {
            Answer::Name(name) => profile.name = Some(name.clone()),
            Answer::Age(age) => profile.age = Some(*age),
            Answer::City(city) => profile.city = Some(city.clone()),
            Answer::Description(description) => profile.description = Some(description.clone()),
            Answer::Photo(photo) => profile.photo_ref = Some(photo.clone()),
        }
    }

    /// A record carrying only this answer, for field-level saves.
    pub fn to_partial(&self) -> Profile {
        let mut partial = Profile::default();
        self.apply_to(&mut partial);
        partial
    }
}

/// Answers held in volatile conversation state; merged into the stored
/// profile only at commit.
#[derive(Debug, Clone)]
pub struct SessionAnswers {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    values: Profile,
}

impl SessionAnswers {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            values: Profile::default(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn record(&mut self, answer: &Answer) {
        answer.apply_to(&mut self.values);
    }

    /// Answers given so far; unanswered fields are `None`.
    pub fn values(&self) -> &Profile {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for SessionAnswers {
    fn default() -> Self {
        Self::new()
    }
}
