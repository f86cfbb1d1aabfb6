use super::support::chat_user::ChatUserFixture;
use formbot::profiles::{City, Profile};
use formbot::FormState;
use serde_json::Value;

fn without_timestamps(mut record: Value) -> Value {
    if let Some(fields) = record.as_object_mut() {
        for key in ["created_at", "updated_at", "last_updated"] {
            fields.remove(key);
        }
    }
    record
}

#[test]
fn stored_values_are_offered_when_a_run_restarts() {
    let mut user = ChatUserFixture::new(5);
    user.say("Create profile");
    user.say("Anna");
    user.say("30");
    user.say("Paris");
    user.say("/cancel");
    assert_eq!(user.state(), None);

    let prompts = user.say("Create profile");
    assert_eq!(prompts[0].quick_replies, vec!["Anna", "Change name"]);
    assert!(prompts[0].text.contains("Anna"));

    let prompts = user.say("Anna");
    assert_eq!(user.state(), Some(FormState::Age));
    let age_prompt = prompts.last().expect("age question");
    assert_eq!(age_prompt.quick_replies, vec!["30"]);

    let prompts = user.say("30");
    assert_eq!(user.state(), Some(FormState::City));
    assert_eq!(prompts[0].quick_replies, vec!["Paris", "Skip"]);
}

#[test]
fn repeating_the_stored_name_changes_only_timestamps() {
    let mut user = ChatUserFixture::new(6);
    let saved = user.chat.store().save(
        &user.user_id,
        &Profile {
            name: Some("Anna".into()),
            ..Profile::default()
        },
    );
    assert!(saved);
    let before = without_timestamps(user.raw_record());

    user.say("Create profile");
    user.say("Anna");
    assert_eq!(user.state(), Some(FormState::Age));
    assert_eq!(without_timestamps(user.raw_record()), before);
}

#[test]
fn repeating_the_stored_age_leaves_the_file_untouched() {
    let mut user = ChatUserFixture::new(8);
    user.chat.store().save(
        &user.user_id,
        &Profile {
            name: Some("Anna".into()),
            age: Some(30),
            city: Some(City::Unspecified),
            ..Profile::default()
        },
    );
    user.say("Create profile");
    user.say("Anna");
    let before = std::fs::read_to_string(user.harness.table_path()).expect("table written");

    user.say("30");
    assert_eq!(user.state(), Some(FormState::City));
    let after = std::fs::read_to_string(user.harness.table_path()).expect("table written");
    assert_eq!(before, after);
}

#[test]
fn unspecified_city_is_not_offered_as_a_choice() {
    let mut user = ChatUserFixture::new(12);
    user.chat.store().save(
        &user.user_id,
        &Profile {
            city: Some(City::Unspecified),
            ..Profile::default()
        },
    );
    user.say("Create profile");
    user.say("Anna");
    let prompts = user.say("30");
    assert_eq!(prompts[0].quick_replies, vec!["Skip"]);
}
