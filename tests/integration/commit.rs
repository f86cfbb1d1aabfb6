use super::support::chat_user::ChatUserFixture;
use super::IntegrationHarness;
use formbot::config::{AppConfig, CachePolicy, PersistPolicy};
use formbot::form::{Answer, CommitError, SessionAnswers};
use formbot::profiles::{City, Description, PhotoRef, Profile, ProfileField};
use formbot::{FormState, ProfileAssembler, UserId};
use serde_json::json;

#[test]
fn commit_merges_session_answers_over_stored_fields() {
    let harness = IntegrationHarness::new();
    let store = harness.store(CachePolicy::WriteThrough);
    let user = UserId::from(100_i64);
    std::fs::write(
        harness.table_path(),
        serde_json::to_string_pretty(&json!({
            "100": {
                "name": "Old",
                "age": 40,
                "city": "Rome",
                "photo": "old-photo",
                "favourite_colour": "green"
            }
        }))
        .expect("serialize fixture"),
    )
    .expect("write fixture");

    let mut answers = SessionAnswers::new();
    answers.record(&Answer::Name("Anna".into()));
    answers.record(&Answer::Photo(PhotoRef::new("new-photo")));

    let committed = ProfileAssembler::new(&store)
        .commit(&user, &answers)
        .expect("stored fields complete the profile");
    assert_eq!(committed.name.as_deref(), Some("Anna"));
    assert_eq!(committed.age, Some(40));
    assert_eq!(committed.city, Some(City::Named("Rome".into())));
    assert_eq!(committed.photo_ref, Some(PhotoRef::new("new-photo")));
    assert_eq!(committed.description, Some(Description::Skipped));
    assert!(committed.last_updated.is_some());

    let raw: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(harness.table_path()).expect("table exists"),
    )
    .expect("table is JSON");
    assert_eq!(raw["100"]["favourite_colour"], "green");
    assert_eq!(raw["100"]["description"], "");
}

#[test]
fn commit_without_photo_is_rejected_and_writes_nothing() {
    let harness = IntegrationHarness::new();
    let store = harness.store(CachePolicy::WriteThrough);
    let user = UserId::from(101_i64);
    store.save(
        &user,
        &Profile {
            name: Some("Anna".into()),
            age: Some(30),
            ..Profile::default()
        },
    );
    let before = std::fs::read_to_string(harness.table_path()).expect("table exists");

    let mut answers = SessionAnswers::new();
    answers.record(&Answer::City(City::Unspecified));
    let err = ProfileAssembler::new(&store)
        .commit(&user, &answers)
        .expect_err("photo is missing");
    assert_eq!(
        err,
        CommitError::Incomplete {
            missing: vec![ProfileField::Photo]
        }
    );
    assert_eq!(
        std::fs::read_to_string(harness.table_path()).expect("table exists"),
        before
    );
}

#[test]
fn committing_twice_keeps_created_at() {
    let harness = IntegrationHarness::new();
    let store = harness.store(CachePolicy::Disabled);
    let user = UserId::from(102_i64);
    let mut answers = SessionAnswers::new();
    for answer in [
        Answer::Name("Anna".into()),
        Answer::Age(30),
        Answer::City(City::Named("Paris".into())),
        Answer::Photo(PhotoRef::new("ph")),
    ] {
        answers.record(&answer);
    }
    let assembler = ProfileAssembler::new(&store);
    let first = assembler.commit(&user, &answers).expect("first commit");
    let second = assembler.commit(&user, &answers).expect("second commit");
    assert_eq!(first.created_at, second.created_at);
    assert!(second.last_updated >= first.last_updated);
}

#[test]
fn failed_commit_stays_in_review_and_can_be_retried() {
    let mut config = AppConfig::default();
    config.store.persist_policy = PersistPolicy::Deferred;
    let mut user = ChatUserFixture::with_config(103, config);
    user.fill_to_review("Anna", "30", "Paris", "I love hiking and good books");
    assert!(!user.harness.table_path().exists());

    std::fs::create_dir(user.harness.table_path()).expect("block the table path");
    let prompts = user.say("Done");
    assert_eq!(user.state(), Some(FormState::Review));
    assert!(prompts[0].text.contains("could not be saved"), "{:?}", prompts[0].text);
    assert_eq!(prompts[0].quick_replies, vec!["Done", "Edit profile"]);

    std::fs::remove_dir(user.harness.table_path()).expect("unblock the table path");
    let prompts = user.say("Done");
    assert_eq!(prompts[0].text, "Your profile has been saved!");
    assert_eq!(user.state(), None);
    let stored = user.stored();
    assert!(stored.is_complete());
    assert_eq!(stored.photo_ref, Some(PhotoRef::new("full")));
}
