use crate::config::AuthFlowConfig;
use crate::contract::model::Role;

/// The domain part of an email, `@` included. Empty when there is no `@`.
pub fn email_domain(email: &str) -> &str {
    match email.find('@') {
        Some(idx) => &email[idx..],
        None => "",
    }
}

/// Resolve the effective role for a new account.
///
/// A pure function of (email, selected): reserved domains override the
/// user's choice; everything else keeps it. Domain comparison is exact and
/// case-sensitive.
pub fn resolve_role(email: &str, selected: Role, config: &AuthFlowConfig) -> Role {
    let domain = email_domain(email);
    if domain == config.admin_domain {
        Role::Admin
    } else if domain == config.faculty_domain {
        Role::Faculty
    } else {
        selected
    }
}

/// True when the email carries one of the enumerated acceptable suffixes.
pub fn is_allowed_email(email: &str, config: &AuthFlowConfig) -> bool {
    if !mailer::domain::service::is_valid_email_shape(email) {
        return false;
    }
    config
        .allowed_domains
        .iter()
        .any(|suffix| email.ends_with(suffix.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> AuthFlowConfig {
        AuthFlowConfig::default()
    }

    #[test]
    fn email_domain_extraction() {
        assert_eq!(email_domain("a@university.edu"), "@university.edu");
        assert_eq!(email_domain("x@admin.university.edu"), "@admin.university.edu");
        assert_eq!(email_domain("no-at-sign"), "");
    }

    #[test]
    fn student_email_keeps_selected_role() {
        let role = resolve_role("student@university.edu", Role::Student, &cfg());
        assert_eq!(role, Role::Student);
    }

    #[test]
    fn admin_domain_overrides_any_selection() {
        for selected in [Role::Student, Role::Alumni, Role::ClubCoordinator] {
            let role = resolve_role("x@admin.university.edu", selected, &cfg());
            assert_eq!(role, Role::Admin);
        }
    }

    #[test]
    fn faculty_domain_overrides_selection() {
        let role = resolve_role("prof@faculty.university.edu", Role::Student, &cfg());
        assert_eq!(role, Role::Faculty);
    }

    #[test]
    fn domain_match_is_case_sensitive() {
        // Upper-cased reserved domain is NOT the reserved domain
        let role = resolve_role("x@ADMIN.university.edu", Role::Student, &cfg());
        assert_eq!(role, Role::Student);
    }

    #[test]
    fn resolution_is_order_independent() {
        let first = resolve_role("a@university.edu", Role::Alumni, &cfg());
        let _ = resolve_role("x@admin.university.edu", Role::Student, &cfg());
        let again = resolve_role("a@university.edu", Role::Alumni, &cfg());
        assert_eq!(first, again);
    }

    #[test]
    fn allow_list_is_an_exact_suffix_set() {
        let cfg = cfg();
        assert!(is_allowed_email("a@university.edu", &cfg));
        assert!(is_allowed_email("b@admin.university.edu", &cfg));
        assert!(is_allowed_email("c@faculty.university.edu", &cfg));
        assert!(is_allowed_email("d@gmail.com", &cfg));
        assert!(!is_allowed_email("e@yahoo.com", &cfg));
        assert!(!is_allowed_email("f@university.com", &cfg));
        assert!(!is_allowed_email("not-an-email", &cfg));
    }
}
