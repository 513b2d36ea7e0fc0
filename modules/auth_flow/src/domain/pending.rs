use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::contract::model::Role;
use crate::domain::cooldown::ResendCooldown;

/// An in-flight registration, held only in memory. A restart loses it and
/// forces the user to request a fresh code.
#[derive(Debug, Clone)]
pub struct PendingRegistration {
    pub email: String,
    pub password: String,
    pub selected_role: Role,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub cooldown: ResendCooldown,
}

impl PendingRegistration {
    pub fn is_expired(&self, now: DateTime<Utc>, ttl_minutes: i64) -> bool {
        now - self.created_at > Duration::minutes(ttl_minutes)
    }
}

/// Pending registrations keyed by lower-cased email.
#[derive(Debug, Default)]
pub struct PendingStore {
    entries: DashMap<String, PendingRegistration>,
}

impl PendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Insert or replace the pending registration for this email.
    pub fn insert(&self, registration: PendingRegistration) {
        self.entries
            .insert(Self::key(&registration.email), registration);
    }

    pub fn get(&self, email: &str) -> Option<PendingRegistration> {
        self.entries.get(&Self::key(email)).map(|r| r.clone())
    }

    /// Replace the retained code, restarting the expiry clock. Returns false
    /// when no registration exists for this email.
    pub fn refresh_code(&self, email: &str, code: String, now: DateTime<Utc>) -> bool {
        match self.entries.get_mut(&Self::key(email)) {
            Some(mut entry) => {
                entry.code = code;
                entry.created_at = now;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, email: &str) {
        self.entries.remove(&Self::key(email));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(email: &str, code: &str) -> PendingRegistration {
        PendingRegistration {
            email: email.to_string(),
            password: "hunter2secret".to_string(),
            selected_role: Role::Student,
            code: code.to_string(),
            created_at: Utc::now(),
            cooldown: ResendCooldown::new(),
        }
    }

    #[test]
    fn lookup_is_case_insensitive_on_email() {
        let store = PendingStore::new();
        store.insert(registration("Student@University.EDU", "1234"));
        assert!(store.get("student@university.edu").is_some());
    }

    #[test]
    fn insert_replaces_previous_registration() {
        let store = PendingStore::new();
        store.insert(registration("a@university.edu", "1111"));
        store.insert(registration("a@university.edu", "2222"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a@university.edu").unwrap().code, "2222");
    }

    #[test]
    fn refresh_code_restarts_expiry() {
        let store = PendingStore::new();
        let mut reg = registration("a@university.edu", "1111");
        reg.created_at = Utc::now() - Duration::minutes(20);
        store.insert(reg);
        assert!(store
            .get("a@university.edu")
            .unwrap()
            .is_expired(Utc::now(), 10));

        assert!(store.refresh_code("a@university.edu", "3333".into(), Utc::now()));
        let refreshed = store.get("a@university.edu").unwrap();
        assert_eq!(refreshed.code, "3333");
        assert!(!refreshed.is_expired(Utc::now(), 10));
    }

    #[test]
    fn refresh_of_unknown_email_reports_false() {
        let store = PendingStore::new();
        assert!(!store.refresh_code("ghost@university.edu", "0000".into(), Utc::now()));
    }

    #[test]
    fn expiry_respects_ttl() {
        let reg = registration("a@university.edu", "1234");
        let now = reg.created_at;
        assert!(!reg.is_expired(now + Duration::minutes(9), 10));
        assert!(reg.is_expired(now + Duration::minutes(11), 10));
    }
}
