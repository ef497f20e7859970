use super::*;

use crate::config::USER_THEME_KEY_PREFIX;
use crate::net::types::User;
use crate::storage::MemoryStore;
use crate::storage::testing::ReadOnlyStore;

// =============================================================
// Helpers
// =============================================================

fn user(id: &str) -> User {
    User { id: id.to_owned(), name: format!("User {id}"), email: format!("{id}@example.com"), avatar: None, role: None }
}

struct Harness {
    backing: MemoryStore,
    session: SessionStore,
    applied: Arc<Mutex<Vec<ThemeMode>>>,
}

impl Harness {
    fn new(entries: &[(&str, &str)]) -> Self {
        let backing = MemoryStore::with_entries(entries.iter().copied());
        let session = SessionStore::new(Arc::new(backing.clone()));
        Self { backing, session, applied: Arc::new(Mutex::new(Vec::new())) }
    }

    fn resolver(&self, prefers_dark: bool) -> ThemeResolver {
        let sink = Arc::clone(&self.applied);
        let applier: Arc<dyn ThemeApplier> = Arc::new(move |mode: ThemeMode| sink.lock().unwrap().push(mode));
        ThemeResolver::new(
            &self.session,
            Arc::new(self.backing.clone()),
            Arc::new(FixedColorScheme { prefers_dark }),
            applier,
        )
    }

    fn applied(&self) -> Vec<ThemeMode> {
        self.applied.lock().unwrap().clone()
    }
}

fn user_key(id: &str) -> String {
    format!("{USER_THEME_KEY_PREFIX}{id}")
}

// =============================================================
// ThemeMode
// =============================================================

#[test]
fn theme_mode_parses_only_legal_literals() {
    assert_eq!("light".parse::<ThemeMode>(), Ok(ThemeMode::Light));
    assert_eq!("dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
    assert_eq!("blue".parse::<ThemeMode>(), Err(ParseThemeModeError("blue".to_owned())));
    assert!("Dark".parse::<ThemeMode>().is_err());
}

#[test]
fn theme_mode_toggle_is_involution() {
    assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
    assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
}

#[test]
fn theme_mode_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&ThemeMode::Dark).unwrap(), "\"dark\"");
    assert_eq!(ThemeMode::Light.to_string(), "light");
}

// =============================================================
// Resolution at construction
// =============================================================

#[test]
fn falls_back_to_system_light() {
    let h = Harness::new(&[]);
    let theme = h.resolver(false);
    assert_eq!(theme.get_theme(), ThemeMode::Light);
    assert_eq!(h.applied(), vec![ThemeMode::Light]);
}

#[test]
fn falls_back_to_system_dark_without_persisting() {
    let h = Harness::new(&[]);
    let theme = h.resolver(true);
    assert_eq!(theme.get_theme(), ThemeMode::Dark);
    assert!(h.backing.is_empty());
}

#[test]
fn global_value_beats_system_signal() {
    let h = Harness::new(&[(GLOBAL_THEME_KEY, "light")]);
    let theme = h.resolver(true);
    assert_eq!(theme.get_theme(), ThemeMode::Light);
}

#[test]
fn user_value_beats_global_value() {
    let key = user_key("a");
    let h = Harness::new(&[(GLOBAL_THEME_KEY, "light"), (key.as_str(), "dark")]);
    h.session.set_user(user("a"));
    let theme = h.resolver(false);
    assert_eq!(theme.get_theme(), ThemeMode::Dark);

    h.session.clear_user();
    assert_eq!(theme.get_theme(), ThemeMode::Light);
}

#[test]
fn foreign_values_are_treated_as_absent() {
    let key = user_key("a");
    let h = Harness::new(&[(GLOBAL_THEME_KEY, "dark"), (key.as_str(), "purple")]);
    h.session.set_user(user("a"));
    let theme = h.resolver(false);
    assert_eq!(theme.get_theme(), ThemeMode::Dark);

    let h = Harness::new(&[(GLOBAL_THEME_KEY, "{}")]);
    assert_eq!(h.resolver(true).get_theme(), ThemeMode::Dark);
}

#[test]
fn construction_applies_once() {
    let h = Harness::new(&[(GLOBAL_THEME_KEY, "dark")]);
    let _theme = h.resolver(false);
    assert_eq!(h.applied(), vec![ThemeMode::Dark]);
}

// =============================================================
// set_theme / toggle_theme
// =============================================================

#[test]
fn set_theme_writes_global_key_when_signed_out() {
    let h = Harness::new(&[]);
    let theme = h.resolver(false);
    theme.set_theme(ThemeMode::Dark);
    assert_eq!(theme.get_theme(), ThemeMode::Dark);
    assert_eq!(h.backing.peek(GLOBAL_THEME_KEY).as_deref(), Some("dark"));
    assert_eq!(h.applied(), vec![ThemeMode::Light, ThemeMode::Dark]);
}

#[test]
fn set_theme_writes_user_key_when_signed_in() {
    let h = Harness::new(&[]);
    h.session.set_user(user("a"));
    let theme = h.resolver(false);
    theme.set_theme(ThemeMode::Dark);
    assert_eq!(h.backing.peek(&user_key("a")).as_deref(), Some("dark"));
    assert_eq!(h.backing.peek(GLOBAL_THEME_KEY), None);
}

#[test]
fn set_same_theme_persists_without_side_effect() {
    let h = Harness::new(&[]);
    let theme = h.resolver(false);
    theme.set_theme(ThemeMode::Light);
    assert_eq!(h.backing.peek(GLOBAL_THEME_KEY).as_deref(), Some("light"));
    assert_eq!(h.applied(), vec![ThemeMode::Light]);
}

#[test]
fn toggle_twice_returns_to_original() {
    let h = Harness::new(&[]);
    let theme = h.resolver(true);
    let original = theme.get_theme();
    theme.toggle_theme();
    assert_eq!(theme.get_theme(), original.toggled());
    theme.toggle_theme();
    assert_eq!(theme.get_theme(), original);
}

#[test]
fn invalid_theme_string_is_ignored() {
    let h = Harness::new(&[]);
    let theme = h.resolver(false);
    theme.set_theme_str("blue");
    assert_eq!(theme.get_theme(), ThemeMode::Light);
    assert!(h.backing.is_empty());
    assert_eq!(h.applied(), vec![ThemeMode::Light]);
}

#[test]
fn valid_theme_string_is_applied() {
    let h = Harness::new(&[]);
    let theme = h.resolver(false);
    theme.set_theme_str("dark");
    assert_eq!(theme.get_theme(), ThemeMode::Dark);
}

#[test]
fn user_scope_wins_over_newer_global_write() {
    let h = Harness::new(&[]);
    h.session.set_user(user("a"));
    let theme = h.resolver(false);
    theme.set_theme(ThemeMode::Dark);

    h.session.clear_user();
    theme.set_theme(ThemeMode::Light);
    h.session.set_user(user("a"));
    assert_eq!(theme.get_theme(), ThemeMode::Dark);
}

// =============================================================
// Session following
// =============================================================

#[test]
fn switching_user_resolves_with_new_users_key() {
    let key_b = user_key("b");
    let h = Harness::new(&[(key_b.as_str(), "light")]);
    h.session.set_user(user("a"));
    let theme = h.resolver(false);
    theme.set_theme(ThemeMode::Dark);

    h.session.set_user(user("b"));
    assert_eq!(theme.get_theme(), ThemeMode::Light);
    assert_eq!(h.applied(), vec![ThemeMode::Light, ThemeMode::Dark, ThemeMode::Light]);
}

#[test]
fn switching_to_user_without_preference_uses_global() {
    let h = Harness::new(&[(GLOBAL_THEME_KEY, "dark")]);
    h.session.set_user(user("a"));
    let theme = h.resolver(false);
    theme.set_theme(ThemeMode::Light);

    h.session.set_user(user("b"));
    assert_eq!(theme.get_theme(), ThemeMode::Dark);
}

#[test]
fn unchanged_resolution_does_not_reapply() {
    let h = Harness::new(&[]);
    let _theme = h.resolver(false);
    h.session.set_user(user("a"));
    h.session.clear_user();
    assert_eq!(h.applied(), vec![ThemeMode::Light]);
}

#[test]
fn user_switched_inside_session_callback_wins() {
    let key_a = user_key("a");
    let key_b = user_key("b");
    let h = Harness::new(&[(key_a.as_str(), "dark"), (key_b.as_str(), "light")]);
    let redirect = h.session.clone();
    let _switch = h.session.subscribe(move |current| {
        if current.as_ref().is_some_and(|u| u.id == "a") {
            redirect.set_user(user("b"));
        }
    });
    let theme = h.resolver(false);

    h.session.set_user(user("a"));
    assert_eq!(h.session.user_id().as_deref(), Some("b"));
    assert_eq!(theme.get_theme(), ThemeMode::Light);

    theme.set_theme(ThemeMode::Dark);
    assert_eq!(h.backing.peek(&key_b).as_deref(), Some("dark"));
    h.session.clear_user();
    h.session.set_user(user("b"));
    assert_eq!(theme.get_theme(), ThemeMode::Dark);
}

#[test]
fn dispose_stops_following_session() {
    let key = user_key("a");
    let h = Harness::new(&[(key.as_str(), "dark")]);
    let theme = h.resolver(false);
    theme.dispose();
    theme.dispose();
    h.session.set_user(user("a"));
    assert_eq!(theme.get_theme(), ThemeMode::Light);
}

#[test]
fn dropping_resolver_releases_subscription() {
    let h = Harness::new(&[]);
    let theme = h.resolver(false);
    let clone = theme.clone();
    drop(theme);
    drop(clone);
    h.session.set_user(user("a"));
    assert_eq!(h.applied(), vec![ThemeMode::Light]);
}

// =============================================================
// Storage failures
// =============================================================

#[test]
fn write_failure_still_changes_active_theme() {
    let backing = ReadOnlyStore::default();
    let session = SessionStore::new(Arc::new(backing.clone()));
    let theme = ThemeResolver::new(
        &session,
        Arc::new(backing),
        Arc::new(FixedColorScheme::default()),
        Arc::new(|_mode: ThemeMode| {}),
    );
    theme.toggle_theme();
    assert_eq!(theme.get_theme(), ThemeMode::Dark);
}
