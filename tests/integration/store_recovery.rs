use super::IntegrationHarness;
use formbot::config::CachePolicy;
use formbot::profiles::Profile;
use formbot::UserId;

fn quarantined_files(harness: &IntegrationHarness) -> Vec<String> {
    std::fs::read_dir(harness.workspace_path())
        .expect("workspace readable")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains(".corrupt-"))
        .collect()
}

#[test]
fn corrupt_table_loads_empty_and_is_replaced_on_save() {
    let harness = IntegrationHarness::new();
    std::fs::write(harness.table_path(), "{ not json").expect("write corrupt table");
    let store = harness.store(CachePolicy::WriteThrough);
    let user = UserId::from(1_i64);

    assert_eq!(store.load(&user), Profile::default());
    assert!(store.all().is_empty());
    assert!(!store.delete(&user));

    let saved = store.save(
        &user,
        &Profile {
            name: Some("Anna".into()),
            ..Profile::default()
        },
    );
    assert!(saved);

    let quarantined = quarantined_files(&harness);
    assert_eq!(quarantined.len(), 1, "{quarantined:?}");
    let moved = std::fs::read_to_string(harness.workspace_path().join(&quarantined[0]))
        .expect("quarantined copy readable");
    assert_eq!(moved, "{ not json");

    let reopened = harness.store(CachePolicy::Disabled);
    assert_eq!(reopened.load(&user).name.as_deref(), Some("Anna"));
}

#[test]
fn empty_file_is_treated_as_a_new_table() {
    let harness = IntegrationHarness::new();
    std::fs::write(harness.table_path(), "  \n").expect("write empty table");
    let store = harness.store(CachePolicy::WriteThrough);
    let user = UserId::from(2_i64);
    assert!(store.load(&user).is_empty());
    assert!(store.save(
        &user,
        &Profile {
            age: Some(25),
            ..Profile::default()
        },
    ));
    assert!(quarantined_files(&harness).is_empty());
}

#[test]
fn unreadable_table_reports_failure() {
    let harness = IntegrationHarness::new();
    std::fs::create_dir(harness.table_path()).expect("directory in place of the table");
    let store = harness.store(CachePolicy::WriteThrough);
    let user = UserId::from(3_i64);
    assert!(!store.save(
        &user,
        &Profile {
            name: Some("Anna".into()),
            ..Profile::default()
        },
    ));
    assert!(store.load(&user).is_empty());
}

#[test]
fn legacy_naive_timestamps_are_read() {
    let harness = IntegrationHarness::new();
    std::fs::write(
        harness.table_path(),
        r#"{"4": {"name": "Anna", "created_at": "2024-03-01T10:15:30.123456", "updated_at": "2024-03-01T10:15:30"}}"#,
    )
    .expect("write legacy table");
    let store = harness.store(CachePolicy::WriteThrough);
    let profile = store.load(&UserId::from(4_i64));
    assert_eq!(profile.name.as_deref(), Some("Anna"));
    let created = profile.created_at.expect("created_at parsed");
    assert_eq!(created.to_rfc3339(), "2024-03-01T10:15:30.123456+00:00");
}
