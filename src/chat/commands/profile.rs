//! Command bridge for profile lookups outside the questionnaire.
//!
//! Converts "my profile" and administrative requests into store calls and
//! user-facing summaries.

use anyhow::{bail, Result};

use crate::chat::Prompt;
use crate::form::prompts::profile_card;
use crate::profiles::{Profile, ProfileStore, UserId};

pub struct ProfileCommandBridge<'a> {
    store: &'a ProfileStore,
}

impl<'a> ProfileCommandBridge<'a> {
    pub fn new(store: &'a ProfileStore) -> Self {
        Self { store }
    }

    /// Card for the user's own stored profile.
    pub fn my_profile(&self, user_id: &UserId) -> Vec<Prompt> {
        let profile = self.store.load(user_id);
        if profile.is_empty() {
            return vec![Prompt::text(
                "You don't have a profile yet. Choose \"Create profile\" to fill one in.",
            )];
        }
        let mut prompts = vec![profile_card(&profile)];
        if !profile.is_complete() {
            prompts.push(Prompt::text(
                "Your profile is not finished yet. Choose \"Create profile\" to continue.",
            ));
        }
        prompts
    }

    pub fn list(&self, request: ProfileListRequest) -> String {
        let profiles = self.store.all();
        if profiles.is_empty() {
            return "No profiles stored.".into();
        }
        let listed: Vec<_> = profiles
            .iter()
            .filter(|(_, profile)| !request.complete_only || profile.is_complete())
            .collect();
        if listed.is_empty() {
            return format!("No complete profiles among {} stored.", profiles.len());
        }
        let mut response = format!(
            "{} of {} profile(s) in {}\n",
            listed.len(),
            profiles.len(),
            self.store.path().display()
        );
        for (user_id, profile) in listed {
            response.push_str(&format_list_line(user_id, profile));
        }
        response
    }

    pub fn show(&self, request: ProfileShowRequest) -> Result<String> {
        let user_id = parse_user_id(&request.user_id)?;
        let profile = self.store.load(&user_id);
        if profile.is_empty() {
            bail!("No profile stored for user {user_id}.");
        }
        Ok(format_show_response(&user_id, &profile, request.include_timestamps))
    }

    pub fn delete(&self, request: ProfileDeleteRequest) -> Result<String> {
        if !request.confirm {
            bail!("profile delete requires --confirm to proceed.");
        }
        let user_id = parse_user_id(&request.user_id)?;
        if self.store.delete(&user_id) {
            Ok(format!("Deleted profile for user {user_id}."))
        } else {
            Ok(format!("No profile deleted for user {user_id}."))
        }
    }
}

fn parse_user_id(raw: &str) -> Result<UserId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("A user id is required.");
    }
    Ok(UserId::from(trimmed))
}

fn format_list_line(user_id: &UserId, profile: &Profile) -> String {
    let status = if profile.is_complete() {
        "complete"
    } else {
        "partial"
    };
    format!(
        "- {user_id}: {} ({status})\n",
        profile.name.as_deref().unwrap_or("<no name>")
    )
}

fn format_show_response(user_id: &UserId, profile: &Profile, include_timestamps: bool) -> String {
    let mut response = format!("Profile for user {user_id}\n");
    let fields = [
        ("Name", profile.name.clone()),
        ("Age", profile.age.map(|age| age.to_string())),
        ("City", profile.city.as_ref().map(|city| city.to_string())),
        (
            "Description",
            profile
                .description
                .as_ref()
                .map(|d| d.text().unwrap_or("(skipped)").to_string()),
        ),
        ("Photo", profile.photo_ref.as_ref().map(|p| p.to_string())),
    ];
    for (label, value) in fields {
        response.push_str(&format!(
            "• {label}: {}\n",
            value.as_deref().unwrap_or("-")
        ));
    }
    let missing = profile.missing_required();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|field| field.key()).collect();
        response.push_str(&format!("Missing: {}\n", names.join(", ")));
    }
    if include_timestamps {
        for (label, ts) in [
            ("Created", profile.created_at),
            ("Last committed", profile.last_updated),
            ("Updated", profile.updated_at),
        ] {
            if let Some(ts) = ts {
                response.push_str(&format!("{label}: {}\n", ts.to_rfc3339()));
            }
        }
    }
    response
}

#[derive(Debug, Clone, Default)]
pub struct ProfileListRequest {
    pub complete_only: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileShowRequest {
    pub user_id: String,
    pub include_timestamps: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileDeleteRequest {
    pub user_id: String,
    pub confirm: bool,
}
