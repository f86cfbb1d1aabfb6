use super::IntegrationHarness;
use formbot::config::CachePolicy;
use formbot::profiles::Profile;
use formbot::UserId;
use std::sync::Arc;
use std::thread;

#[test]
fn concurrent_saves_for_different_users_are_all_kept() {
    let harness = IntegrationHarness::new();
    let store = Arc::new(harness.store(CachePolicy::WriteThrough));

    let handles: Vec<_> = (0..16_i64)
        .map(|id| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let user = UserId::from(id);
                let name = format!("User {id}");
                assert!(store.save(
                    &user,
                    &Profile {
                        name: Some(name),
                        ..Profile::default()
                    },
                ));
                assert!(store.save(
                    &user,
                    &Profile {
                        age: Some(20 + id as u8),
                        ..Profile::default()
                    },
                ));
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("save thread panicked");
    }

    let fresh = harness.store(CachePolicy::Disabled);
    let all = fresh.all();
    assert_eq!(all.len(), 16);
    for id in 0..16_i64 {
        let profile = &all[&UserId::from(id)];
        assert_eq!(profile.name.as_deref(), Some(format!("User {id}").as_str()));
        assert_eq!(profile.age, Some(20 + id as u8));
    }
}

#[test]
fn two_stores_on_one_file_do_not_lose_updates() {
    let harness = IntegrationHarness::new();
    let first = Arc::new(harness.store(CachePolicy::Invalidate));
    let second = Arc::new(harness.store(CachePolicy::Invalidate));

    let handles: Vec<_> = [first, second]
        .into_iter()
        .enumerate()
        .map(|(offset, store)| {
            thread::spawn(move || {
                for step in 0..10_i64 {
                    let id = step * 2 + offset as i64;
                    assert!(store.save(
                        &UserId::from(id),
                        &Profile {
                            age: Some(30),
                            ..Profile::default()
                        },
                    ));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("save thread panicked");
    }

    assert_eq!(harness.store(CachePolicy::Disabled).all().len(), 20);
}
