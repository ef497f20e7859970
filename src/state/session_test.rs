use super::*;
use std::sync::Mutex;

use crate::storage::MemoryStore;
use crate::storage::testing::ReadOnlyStore;

// =============================================================
// Helpers
// =============================================================

fn make_user() -> User {
    User {
        id: "1".to_owned(),
        name: "John Doe".to_owned(),
        email: "john@example.com".to_owned(),
        avatar: Some("https://example.com/avatar.jpg".to_owned()),
        role: Some("admin".to_owned()),
    }
}

fn make_store() -> (SessionStore, MemoryStore) {
    let backing = MemoryStore::new();
    (SessionStore::new(Arc::new(backing.clone())), backing)
}

fn record(session: &SessionStore) -> (Arc<Mutex<Vec<Option<User>>>>, Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let sub = session.subscribe(move |user| sink.lock().unwrap().push(user.clone()));
    (seen, sub)
}

// =============================================================
// Initial state
// =============================================================

#[test]
fn starts_signed_out_with_empty_storage() {
    let (session, _) = make_store();
    assert_eq!(session.get_user(), None);
    assert!(!session.is_user_logged_in());
}

#[test]
fn restores_persisted_snapshot() {
    let raw = serde_json::to_string(&make_user()).unwrap();
    let session = SessionStore::new(Arc::new(MemoryStore::with_entries([(SESSION_KEY, raw.as_str())])));
    assert_eq!(session.get_user(), Some(make_user()));
    assert!(session.is_user_logged_in());
}

#[test]
fn corrupt_snapshot_is_discarded_and_removed() {
    let backing = MemoryStore::with_entries([(SESSION_KEY, "not-json")]);
    let session = SessionStore::new(Arc::new(backing.clone()));
    assert_eq!(session.get_user(), None);
    assert!(!session.is_user_logged_in());
    assert_eq!(backing.peek(SESSION_KEY), None);
}

#[test]
fn snapshot_with_blank_id_is_discarded() {
    let backing = MemoryStore::with_entries([(SESSION_KEY, r#"{"id":"","name":"X","email":"x@y.z"}"#)]);
    let session = SessionStore::new(Arc::new(backing.clone()));
    assert_eq!(session.get_user(), None);
    assert_eq!(backing.peek(SESSION_KEY), None);
}

// =============================================================
// set / get / clear
// =============================================================

#[test]
fn set_user_then_get_returns_same_user() {
    let (session, backing) = make_store();
    session.set_user(make_user());
    assert_eq!(session.get_user(), Some(make_user()));
    assert!(session.is_user_logged_in());
    assert_eq!(backing.peek(SESSION_KEY), Some(serde_json::to_string(&make_user()).unwrap()));
}

#[test]
fn set_user_fully_replaces_previous_snapshot() {
    let (session, _) = make_store();
    session.set_user(make_user());
    let other = User { id: "2".to_owned(), name: "Ann".to_owned(), email: "ann@x.io".to_owned(), avatar: None, role: None };
    session.set_user(other.clone());
    assert_eq!(session.get_user(), Some(other));
}

#[test]
fn set_user_without_id_is_ignored() {
    let (session, backing) = make_store();
    let (seen, _sub) = record(&session);
    session.set_user(User { id: String::new(), ..make_user() });
    assert_eq!(session.get_user(), None);
    assert!(backing.is_empty());
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn clear_user_signs_out_and_removes_snapshot() {
    let (session, backing) = make_store();
    session.set_user(make_user());
    session.clear_user();
    assert_eq!(session.get_user(), None);
    assert!(!session.is_user_logged_in());
    assert_eq!(backing.peek(SESSION_KEY), None);
}

#[test]
fn clear_user_when_signed_out_stays_signed_out() {
    let (session, _) = make_store();
    session.clear_user();
    assert_eq!(session.get_user(), None);
}

#[test]
fn user_id_reads_current_id() {
    let (session, _) = make_store();
    assert_eq!(session.user_id(), None);
    session.set_user(make_user());
    assert_eq!(session.user_id().as_deref(), Some("1"));
}

// =============================================================
// update_user
// =============================================================

#[test]
fn update_user_without_session_is_noop() {
    let (session, backing) = make_store();
    let (seen, _sub) = record(&session);
    session.update_user(UserPatch::name("New Name"));
    assert_eq!(session.get_user(), None);
    assert!(backing.is_empty());
    assert_eq!(*seen.lock().unwrap(), vec![None]);
}

#[test]
fn update_user_changes_only_given_fields() {
    let (session, backing) = make_store();
    session.set_user(make_user());
    session.update_user(UserPatch::name("Jane Doe"));

    let updated = session.get_user().unwrap();
    assert_eq!(updated.name, "Jane Doe");
    assert_eq!(updated.email, "john@example.com");
    assert_eq!(updated.id, "1");
    assert!(backing.peek(SESSION_KEY).unwrap().contains("Jane Doe"));
}

// =============================================================
// subscribe
// =============================================================

#[test]
fn subscribe_replays_absent_value() {
    let (session, _) = make_store();
    let (seen, _sub) = record(&session);
    assert_eq!(*seen.lock().unwrap(), vec![None]);
}

#[test]
fn subscribers_see_set_update_and_clear() {
    let (session, _) = make_store();
    let (seen, _sub) = record(&session);
    session.set_user(make_user());
    session.update_user(UserPatch::name("Jane Doe"));
    session.clear_user();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    assert_eq!(seen[1], Some(make_user()));
    assert_eq!(seen[2].as_ref().map(|u| u.name.as_str()), Some("Jane Doe"));
    assert_eq!(seen[3], None);
}

#[test]
fn dropped_subscription_stops_notifications() {
    let (session, _) = make_store();
    let (seen, sub) = record(&session);
    drop(sub);
    session.set_user(make_user());
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn user_switched_inside_callback_is_last_value_seen() {
    let (session, backing) = make_store();
    let redirect = session.clone();
    let _switch = session.subscribe(move |current| {
        if current.as_ref().is_some_and(|u| u.id == "1") {
            redirect.set_user(User { id: "2".to_owned(), ..make_user() });
        }
    });
    let (seen, _sub) = record(&session);

    session.set_user(make_user());
    let last = seen.lock().unwrap().last().cloned().flatten();
    assert_eq!(last.map(|u| u.id), Some("2".to_owned()));
    assert_eq!(session.user_id().as_deref(), Some("2"));
    assert!(backing.peek(SESSION_KEY).unwrap().contains(r#""id":"2""#));
}

#[test]
fn clones_share_one_session() {
    let (session, _) = make_store();
    let other = session.clone();
    other.set_user(make_user());
    assert!(session.is_user_logged_in());
}

// =============================================================
// Storage failures
// =============================================================

#[test]
fn write_failure_keeps_memory_authoritative() {
    let session = SessionStore::new(Arc::new(ReadOnlyStore::default()));
    let (seen, _sub) = record(&session);
    session.set_user(make_user());
    assert_eq!(session.get_user(), Some(make_user()));
    assert_eq!(seen.lock().unwrap().len(), 2);

    session.clear_user();
    assert_eq!(session.get_user(), None);
}

#[test]
fn corrupt_snapshot_with_failing_remove_still_starts_signed_out() {
    let inner = MemoryStore::with_entries([(SESSION_KEY, "{")]);
    let session = SessionStore::new(Arc::new(ReadOnlyStore { inner }));
    assert_eq!(session.get_user(), None);
}
