//! Client-side retention for the sign-up form.
//!
//! The sign-up page survives server-side validation round-trips by mirroring
//! every field edit into a durable, origin-scoped key-value store. Secret
//! fields never reach the store: the persisted snapshot always carries empty
//! `password` and `secret_code`, and both are forced empty again on restore.
//! A snapshot that fails to parse is logged and discarded; the user starts
//! from an empty form instead of seeing an error.

use std::collections::HashMap;

use tracing::warn;

use crate::api::handlers::auth::types::SignupForm;

/// Fixed storage key for the sign-up snapshot.
pub const STORAGE_KEY: &str = "signupFormData";

/// Minimal synchronous key-value store. Backed by the browser's origin
/// storage when embedded in the site shell, or by [`MemoryStore`] in tests.
pub trait SnapshotStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Working copy of the sign-up form plus its durable mirror.
///
/// Last write wins; concurrent writers are not coordinated.
pub struct FormCache<S: SnapshotStore> {
    store: S,
    working: SignupForm,
}

impl<S: SnapshotStore> FormCache<S> {
    /// Open the cache, restoring any stored snapshot.
    pub fn open(store: S) -> Self {
        let working = restore(&store);
        Self { store, working }
    }

    /// Current editable state, secrets included while editing.
    #[must_use]
    pub fn form(&self) -> &SignupForm {
        &self.working
    }

    /// Merge one field edit into the working copy and persist the full
    /// redacted snapshot. Unknown field names are ignored.
    pub fn record_change(&mut self, field: &str, value: &str) {
        apply(&mut self.working, field, value);
        self.persist();
    }

    /// Hand the store back, e.g. across a page reload in tests.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) {
        let snapshot = redact(&self.working);
        match serde_json::to_string(&snapshot) {
            Ok(encoded) => self.store.set(STORAGE_KEY, &encoded),
            Err(err) => warn!("Failed to encode form snapshot: {err}"),
        }
    }
}

fn restore<S: SnapshotStore>(store: &S) -> SignupForm {
    let Some(raw) = store.get(STORAGE_KEY) else {
        return SignupForm::default();
    };
    match serde_json::from_str::<SignupForm>(&raw) {
        // Secrets come back empty no matter what the store holds.
        Ok(snapshot) => redact(&snapshot),
        Err(err) => {
            warn!("Failed to parse saved form data: {err}");
            SignupForm::default()
        }
    }
}

fn redact(form: &SignupForm) -> SignupForm {
    SignupForm {
        password: String::new(),
        secret_code: String::new(),
        ..form.clone()
    }
}

fn apply(form: &mut SignupForm, field: &str, value: &str) {
    match field {
        "full_name" => form.full_name = value.to_string(),
        "email" => form.email = value.to_string(),
        "password" => form.password = value.to_string(),
        "secret_code" => form.secret_code = value.to_string(),
        "join_year" => form.join_year = value.to_string(),
        "phone_number" => form.phone_number = value.to_string(),
        "profession" => form.profession = value.to_string(),
        _ => {}
    }
}

/// In-memory store for tests and non-browser embedders.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}
