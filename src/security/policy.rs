//! URL-pattern access rules.
//!
//! Rules are checked in order and the first pattern matching the request
//! path decides. Paths no rule matches are public.

use thiserror::Error;

use crate::models::UserRole;

use super::Caller;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("path pattern `{0}` must start with `/`")]
    NotAbsolute(String),
    #[error("path pattern `{0}` may only use `**` as its last segment")]
    MisplacedWildcard(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    /// `/base/**`: `/base` itself and everything beneath it. An empty base
    /// matches every path.
    Subtree(String),
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::NotAbsolute(pattern.to_owned()));
        }

        match pattern.strip_suffix("/**") {
            Some(base) if !base.contains("**") => Ok(Self::Subtree(base.to_owned())),
            Some(_) => Err(PatternError::MisplacedWildcard(pattern.to_owned())),
            None if pattern.contains("**") => {
                Err(PatternError::MisplacedWildcard(pattern.to_owned()))
            }
            None => Ok(Self::Exact(pattern.to_owned())),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::Subtree(base) => match path.strip_prefix(base.as_str()) {
                Some(rest) => base.is_empty() || rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    PermitAll,
    Authenticated,
    Role(UserRole),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pattern: PathPattern,
    access: Access,
}

impl Rule {
    pub fn new(pattern: &str, access: Access) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: PathPattern::parse(pattern)?,
            access,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Anonymous,
    MissingRole,
}

impl DenyReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::MissingRole => "missing_role",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Every denial looks the same to the client; `reason` is for logs only.
    DenyUnauthenticated { reason: DenyReason },
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationPolicy {
    rules: Vec<Rule>,
}

impl AuthorizationPolicy {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The bank's rules: `/api/s/**` needs any login, `/api/admin/**` needs
    /// the admin role, everything else is public.
    pub fn bank() -> Result<Self, PatternError> {
        Ok(Self::new(vec![
            Rule::new("/api/s/**", Access::Authenticated)?,
            Rule::new("/api/admin/**", Access::Role(UserRole::Admin))?,
        ]))
    }

    pub fn evaluate(&self, path: &str, caller: Option<&Caller>) -> Decision {
        let access = self
            .rules
            .iter()
            .find(|rule| rule.pattern.matches(path))
            .map_or(Access::PermitAll, |rule| rule.access);

        match (access, caller) {
            (Access::PermitAll, _) => Decision::Allow,
            (_, None) => Decision::DenyUnauthenticated {
                reason: DenyReason::Anonymous,
            },
            (Access::Authenticated, Some(_)) => Decision::Allow,
            (Access::Role(role), Some(caller)) if caller.has_role(role) => Decision::Allow,
            (Access::Role(_), Some(_)) => Decision::DenyUnauthenticated {
                reason: DenyReason::MissingRole,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn policy() -> AuthorizationPolicy {
        AuthorizationPolicy::bank().unwrap()
    }

    fn customer() -> Caller {
        Caller::new(1, UserRole::Customer)
    }

    fn admin() -> Caller {
        Caller::new(2, UserRole::Admin)
    }

    #[rstest]
    #[case("/api/s/**", "/api/s", true)]
    #[case("/api/s/**", "/api/s/account/1111", true)]
    #[case("/api/s/**", "/api/sx", false)]
    #[case("/api/s/**", "/api", false)]
    #[case("/**", "/anything/at/all", true)]
    #[case("/api/join", "/api/join", true)]
    #[case("/api/join", "/api/join/2", false)]
    fn patterns_match(#[case] pattern: &str, #[case] path: &str, #[case] expected: bool) {
        assert_eq!(PathPattern::parse(pattern).unwrap().matches(path), expected);
    }

    #[rstest]
    #[case("api/s/**", PatternError::NotAbsolute("api/s/**".to_owned()))]
    #[case("/api/**/x", PatternError::MisplacedWildcard("/api/**/x".to_owned()))]
    #[case("/**/a/**", PatternError::MisplacedWildcard("/**/a/**".to_owned()))]
    fn rejects_bad_patterns(#[case] pattern: &str, #[case] expected: PatternError) {
        assert_eq!(PathPattern::parse(pattern), Err(expected));
    }

    #[test]
    fn anonymous_secured_request_is_denied() {
        assert_eq!(
            policy().evaluate("/api/s/accounts", None),
            Decision::DenyUnauthenticated {
                reason: DenyReason::Anonymous
            }
        );
    }

    #[rstest]
    #[case(customer())]
    #[case(admin())]
    fn any_login_reaches_secured_paths(#[case] caller: Caller) {
        assert!(policy().evaluate("/api/s/account/login-user", Some(&caller)).is_allowed());
    }

    #[test]
    fn customer_is_denied_admin_paths() {
        assert_eq!(
            policy().evaluate("/api/admin/users", Some(&customer())),
            Decision::DenyUnauthenticated {
                reason: DenyReason::MissingRole
            }
        );
    }

    #[test]
    fn anonymous_admin_request_is_denied_as_anonymous() {
        assert_eq!(
            policy().evaluate("/api/admin/users", None),
            Decision::DenyUnauthenticated {
                reason: DenyReason::Anonymous
            }
        );
    }

    #[test]
    fn admin_reaches_admin_paths() {
        assert!(policy().evaluate("/api/admin/users", Some(&admin())).is_allowed());
    }

    #[test]
    fn first_matching_rule_wins() {
        let policy = AuthorizationPolicy::new(vec![
            Rule::new("/api/**", Access::PermitAll).unwrap(),
            Rule::new("/api/s/**", Access::Authenticated).unwrap(),
        ]);

        assert!(policy.evaluate("/api/s/account", None).is_allowed());
    }

    fn path_segment() -> impl Strategy<Value = String> {
        "[a-z0-9-]{1,8}"
    }

    proptest! {
        #[test]
        fn unguarded_paths_are_always_allowed(
            segments in prop::collection::vec(path_segment(), 0..4),
            logged_in in any::<bool>(),
        ) {
            let path = format!("/{}", segments.join("/"));
            prop_assume!(!(path == "/api/s" || path.starts_with("/api/s/")));
            prop_assume!(!(path == "/api/admin" || path.starts_with("/api/admin/")));

            let caller = logged_in.then(customer);
            prop_assert!(policy().evaluate(&path, caller.as_ref()).is_allowed());
        }

        #[test]
        fn secured_paths_deny_anonymous(segments in prop::collection::vec(path_segment(), 0..4)) {
            let path = format!("/api/s/{}", segments.join("/"));
            prop_assert!(!policy().evaluate(&path, None).is_allowed());
        }

        #[test]
        fn admin_paths_deny_customers(segments in prop::collection::vec(path_segment(), 0..4)) {
            let path = format!("/api/admin/{}", segments.join("/"));
            prop_assert!(!policy().evaluate(&path, Some(&customer())).is_allowed());
        }
    }
}
