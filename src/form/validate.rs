//! Input validation for each questionnaire step.
//!
//! A rejected answer is an ordinary outcome, not an error: the caller shows
//! [`Rejection::message`] and asks again.

use crate::chat::PhotoVariant;
use crate::config::ValidationSettings;
use crate::profiles::{City, Description, UNSPECIFIED_CITY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NameTooShort { min: usize },
    NameTooLong { max: usize },
    AgeNotANumber,
    AgeBelowMinimum { min: u8 },
    AgeAboveMaximum { max: u8 },
    CityTooShort { min: usize },
    CityTooLong { max: usize },
    DescriptionTooShort { min_chars: usize, min_words: usize },
    ForbiddenContent,
}

impl Rejection {
    pub fn message(&self) -> String {
        match self {
            Rejection::NameTooShort { min } => {
                format!("Your name must be at least {min} characters long. Try again!")
            }
            Rejection::NameTooLong { max } => {
                format!("That name is too long. Use at most {max} characters.")
            }
            Rejection::AgeNotANumber => "Age must be a number. Try again!".into(),
            Rejection::AgeBelowMinimum { min } => format!("The minimum age is {min}."),
            Rejection::AgeAboveMaximum { max } => format!("The maximum age is {max}."),
            Rejection::CityTooShort { .. } => "That city name is too short.".into(),
            Rejection::CityTooLong { max } => {
                format!("That city name is too long. Use at most {max} characters.")
            }
            Rejection::DescriptionTooShort {
                min_chars,
                min_words,
            } => format!(
                "The description must be at least {min_chars} characters and {min_words} words long."
            ),
            Rejection::ForbiddenContent => "Your description contains forbidden words.".into(),
        }
    }
}

pub struct Validator<'a> {
    settings: &'a ValidationSettings,
}

impl<'a> Validator<'a> {
    pub fn new(settings: &'a ValidationSettings) -> Self {
        Self { settings }
    }

    /// Case-insensitive match of the configured skip keyword.
    pub fn is_skip(&self, raw: &str) -> bool {
        raw.trim().to_lowercase() == self.settings.skip_keyword.to_lowercase()
    }

    pub fn name(&self, raw: &str) -> Result<String, Rejection> {
        let name = raw.trim();
        let len = name.chars().count();
        if len < self.settings.name_min_chars {
            return Err(Rejection::NameTooShort {
                min: self.settings.name_min_chars,
            });
        }
        if len > self.settings.name_max_chars {
            return Err(Rejection::NameTooLong {
                max: self.settings.name_max_chars,
            });
        }
        Ok(name.to_string())
    }

    pub fn age(&self, raw: &str) -> Result<u8, Rejection> {
        let digits = raw.trim();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(Rejection::AgeNotANumber);
        }
        let above = Rejection::AgeAboveMaximum {
            max: self.settings.age_max,
        };
        // All digits, so a parse failure can only be overflow.
        let value: u32 = digits.parse().map_err(|_| above.clone())?;
        if value < u32::from(self.settings.age_min) {
            return Err(Rejection::AgeBelowMinimum {
                min: self.settings.age_min,
            });
        }
        if value > u32::from(self.settings.age_max) {
            return Err(above);
        }
        u8::try_from(value).map_err(|_| above)
    }

    pub fn city(&self, raw: &str) -> Result<City, Rejection> {
        if self.is_skip(raw) {
            return Ok(City::Unspecified);
        }
        let city = raw.trim();
        // The sentinel reads back as `City::Unspecified`, so it cannot be a name.
        if city.eq_ignore_ascii_case(UNSPECIFIED_CITY) {
            return Ok(City::Unspecified);
        }
        let len = city.chars().count();
        if len < self.settings.city_min_chars {
            return Err(Rejection::CityTooShort {
                min: self.settings.city_min_chars,
            });
        }
        if len > self.settings.city_max_chars {
            return Err(Rejection::CityTooLong {
                max: self.settings.city_max_chars,
            });
        }
        Ok(City::Named(city.to_string()))
    }

    pub fn description(&self, raw: &str) -> Result<Description, Rejection> {
        if self.is_skip(raw) {
            return Ok(Description::Skipped);
        }
        let text = raw.trim();
        if text.chars().count() < self.settings.description_min_chars
            || text.split_whitespace().count() < self.settings.description_min_words
        {
            return Err(Rejection::DescriptionTooShort {
                min_chars: self.settings.description_min_chars,
                min_words: self.settings.description_min_words,
            });
        }
        let lowered = text.to_lowercase();
        let forbidden = self
            .settings
            .forbidden_words
            .iter()
            .map(|word| word.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .any(|word| lowered.contains(&word));
        if forbidden {
            return Err(Rejection::ForbiddenContent);
        }
        Ok(Description::Text(text.to_string()))
    }
}

/// Largest variant by pixel count, then file size; later variants win ties.
pub fn best_photo(variants: &[PhotoVariant]) -> Option<&PhotoVariant> {
    variants
        .iter()
        .max_by_key(|variant| (variant.pixels(), variant.file_size.unwrap_or(0)))
}
