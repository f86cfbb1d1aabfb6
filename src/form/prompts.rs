//! Fixed English copy for the questionnaire and the review card.

use crate::chat::Prompt;
use crate::profiles::{City, Profile, ProfileField};

pub const DONE: &str = "Done";
pub const EDIT_PROFILE: &str = "Edit profile";
pub const CHANGE_NAME: &str = "Change name";

pub fn edit_label(field: ProfileField) -> &'static str {
    match field {
        ProfileField::Name => "Edit name",
        ProfileField::Age => "Edit age",
        ProfileField::City => "Edit city",
        ProfileField::Description => "Edit description",
        ProfileField::Photo => "Edit photo",
    }
}

/// Quick-reply label for the configured skip keyword ("skip" -> "Skip").
pub fn skip_label(keyword: &str) -> String {
    let mut chars = keyword.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn ask_name(stored: Option<&str>) -> Prompt {
    match stored {
        Some(name) => Prompt::text(format!(
            "Your current name: {name}\nKeep it or type a new one:"
        ))
        .with_quick_replies([name, CHANGE_NAME]),
        None => Prompt::text("Let's start with your name! What should I call you?"),
    }
}

pub fn ask_age(min: u8, max: u8, stored: Option<u8>) -> Prompt {
    Prompt::text(format!("How old are you? ({min} to {max})"))
        .with_quick_replies(stored.map(|age| age.to_string()))
}

pub fn ask_city(stored: Option<&City>, skip: &str) -> Prompt {
    let mut options = Vec::new();
    if let Some(name) = stored.and_then(City::name) {
        options.push(name.to_string());
    }
    options.push(skip_label(skip));
    Prompt::text("Which city do you live in?").with_quick_replies(options)
}

pub fn ask_description(min_chars: usize, skip: &str) -> Prompt {
    Prompt::text(format!(
        "Now tell us a little about yourself (at least {min_chars} characters):"
    ))
    .with_quick_replies([skip_label(skip)])
}

pub fn ask_photo() -> Prompt {
    Prompt::text("Send a photo for your profile.\nA clear photo of your face works best.")
}

pub fn name_accepted(name: &str) -> Prompt {
    Prompt::text(format!("Nice to meet you, {name}!"))
}

pub fn description_saved(skipped: bool) -> Prompt {
    if skipped {
        Prompt::text("Description skipped.")
    } else {
        Prompt::text("Description saved!")
    }
}

pub fn review_question() -> Prompt {
    Prompt::text("This is how your profile will look. Is everything correct?")
        .with_quick_replies([DONE, EDIT_PROFILE])
}

pub fn review_hint() -> Prompt {
    Prompt::text(format!(
        "Choose \"{DONE}\" to save your profile or \"{EDIT_PROFILE}\" to change it."
    ))
    .with_quick_replies([DONE, EDIT_PROFILE])
}

pub fn edit_menu() -> Prompt {
    Prompt::text("Let's fix your profile. What would you like to change?")
        .with_quick_replies(ProfileField::ALL.map(edit_label))
}

pub fn committed() -> Prompt {
    Prompt::text("Your profile has been saved!")
}

pub fn incomplete(missing: &[ProfileField]) -> Prompt {
    let fields = missing
        .iter()
        .map(|field| field.key())
        .collect::<Vec<_>>()
        .join(", ");
    Prompt::text(format!(
        "Your profile is incomplete (missing: {fields}). Use \"{EDIT_PROFILE}\" to fill it in."
    ))
    .with_quick_replies([DONE, EDIT_PROFILE])
}

pub fn save_failed() -> Prompt {
    Prompt::text("Sorry, something went wrong while saving. Please try again.")
}

pub fn commit_failed() -> Prompt {
    Prompt::text(format!(
        "Sorry, your profile could not be saved. Choose \"{DONE}\" to try again."
    ))
    .with_quick_replies([DONE, EDIT_PROFILE])
}

/// Caption for the profile card.
pub fn profile_caption(profile: &Profile) -> String {
    let name = profile.name.as_deref().unwrap_or("Name not set");
    let age = profile
        .age
        .map(|age| age.to_string())
        .unwrap_or_else(|| "age not set".into());
    let city = match &profile.city {
        Some(City::Named(city)) => city.clone(),
        Some(City::Unspecified) => "City not specified".into(),
        None => "city not set".into(),
    };
    let description = profile
        .description
        .as_ref()
        .and_then(|d| d.text())
        .unwrap_or("No description");
    format!("{name}, {age}, {city}\n{description}")
}

/// Card showing the profile, with the photo attached when there is one.
pub fn profile_card(profile: &Profile) -> Prompt {
    let caption = profile_caption(profile);
    match &profile.photo_ref {
        Some(photo) => Prompt::image(photo.clone(), caption),
        None => Prompt::text(caption),
    }
}
