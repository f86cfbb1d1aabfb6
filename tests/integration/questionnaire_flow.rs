use super::support::chat_user::ChatUserFixture;
use formbot::chat::PhotoVariant;
use formbot::profiles::{City, Description, PhotoRef};
use formbot::FormState;

#[test]
fn full_questionnaire_commits_a_complete_profile() {
    let mut user = ChatUserFixture::new(42);

    let prompts = user.say("/start");
    assert_eq!(prompts[0].quick_replies, vec!["Create profile", "My profile"]);

    let prompts = user.say("Create profile");
    assert_eq!(user.state(), Some(FormState::Name));
    assert!(prompts[0].text.contains("name"));

    let prompts = user.say("Anna");
    assert_eq!(prompts[0].text, "Nice to meet you, Anna!");
    assert_eq!(user.state(), Some(FormState::Age));

    user.say("30");
    assert_eq!(user.state(), Some(FormState::City));

    user.say("Paris");
    assert_eq!(user.state(), Some(FormState::Description));

    let prompts = user.say("I love hiking and good books");
    assert_eq!(prompts[0].text, "Description saved!");
    assert_eq!(user.state(), Some(FormState::Photo));

    let prompts = user.send_photo(vec![
        PhotoVariant::new("small", 90, 90),
        PhotoVariant::new("large", 1280, 960),
        PhotoVariant::new("medium", 320, 240),
    ]);
    assert_eq!(user.state(), Some(FormState::Review));
    let card = prompts[0].image.as_ref().expect("review card carries the photo");
    assert_eq!(card.photo_ref, PhotoRef::new("large"));
    assert_eq!(card.caption, "Anna, 30, Paris\nI love hiking and good books");
    assert_eq!(prompts[1].quick_replies, vec!["Done", "Edit profile"]);

    let prompts = user.say("Done");
    assert_eq!(prompts[0].text, "Your profile has been saved!");
    assert_eq!(user.state(), None);

    let stored = user.stored();
    assert!(stored.is_complete());
    assert_eq!(stored.city, Some(City::Named("Paris".into())));
    assert!(stored.created_at.is_some());
    assert!(stored.last_updated.is_some());
}

#[test]
fn invalid_answers_are_reprompted_without_advancing() {
    let mut user = ChatUserFixture::new(7);
    user.say("Create profile");

    let prompts = user.say("A");
    assert_eq!(prompts.len(), 1);
    assert_eq!(user.state(), Some(FormState::Name));
    user.say("Anna");

    for bad in ["abc", "-5", "3", "250", "12.5"] {
        user.say(bad);
        assert_eq!(user.state(), Some(FormState::Age), "accepted {bad:?}");
    }
    user.say("12");
    assert_eq!(user.state(), Some(FormState::City));

    user.say("SKIP");
    assert_eq!(user.state(), Some(FormState::Description));

    user.say("short");
    assert_eq!(user.state(), Some(FormState::Description));
    user.say("buy my advertising package today");
    assert_eq!(user.state(), Some(FormState::Description));
    let prompts = user.say("skip");
    assert_eq!(prompts[0].text, "Description skipped.");
    assert_eq!(user.state(), Some(FormState::Photo));

    // Text while waiting for a photo is ignored.
    assert!(user.say("where do I upload?").is_empty());
    assert_eq!(user.state(), Some(FormState::Photo));

    let raw = user.raw_record();
    assert_eq!(raw["name"], "Anna");
    assert_eq!(raw["age"], 12);
    assert_eq!(raw["city"], "unspecified");
    assert_eq!(raw["description"], "");
    assert!(raw.get("photo").is_none());
}

#[test]
fn editing_from_review_returns_to_review() {
    let mut user = ChatUserFixture::new(9);
    user.fill_to_review("Anna", "30", "Paris", "I love hiking and good books");

    let prompts = user.say("Edit profile");
    assert_eq!(prompts[0].quick_replies.len(), 5);
    assert_eq!(user.state(), Some(FormState::Review));

    user.say("Edit city");
    assert_eq!(user.state(), Some(FormState::City));
    let prompts = user.say("Berlin");
    assert_eq!(user.state(), Some(FormState::Review));
    let card = prompts[0].image.as_ref().expect("card with photo");
    assert!(card.caption.starts_with("Anna, 30, Berlin"));

    user.say("done");
    assert_eq!(user.state(), None);
    assert_eq!(user.stored().city, Some(City::Named("Berlin".into())));
    assert_eq!(
        user.stored().description,
        Some(Description::Text("I love hiking and good books".into()))
    );
}

#[test]
fn unknown_review_reply_repeats_the_options() {
    let mut user = ChatUserFixture::new(10);
    user.fill_to_review("Anna", "30", "Paris", "I love hiking and good books");
    let prompts = user.say("maybe later");
    assert_eq!(user.state(), Some(FormState::Review));
    assert_eq!(prompts[0].quick_replies, vec!["Done", "Edit profile"]);
}

#[test]
fn my_profile_shows_the_stored_card() {
    let mut user = ChatUserFixture::new(11);
    let prompts = user.say("My profile");
    assert!(prompts[0].text.contains("don't have a profile"));

    user.fill_to_review("Anna", "30", "Paris", "I love hiking and good books");
    user.say("Done");
    let prompts = user.say("my profile");
    assert_eq!(prompts.len(), 1);
    assert_eq!(
        prompts[0].image.as_ref().map(|image| image.photo_ref.clone()),
        Some(PhotoRef::new("full"))
    );
}
