use super::{Role, Rule};
use serde::Serialize;
use std::fmt;

/// The outcome of checking a role against a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    pub fn is_allowed(self) -> bool {
        matches!(self, Access::Allow)
    }
}

/// The precedence step that decided an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "role", rename_all = "snake_case")]
pub enum DecisionReason {
    /// The role is explicitly disallowed.
    Disallowed(Role),
    /// The rule admits every role that is not disallowed.
    AllowAll,
    /// The role is explicitly allowed.
    Allowed(Role),
    /// No role matched and the rule does not allow all.
    NotListed,
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionReason::Disallowed(role) => write!(f, "role '{}' is disallowed", role),
            DecisionReason::AllowAll => write!(f, "route allows all roles"),
            DecisionReason::Allowed(role) => write!(f, "role '{}' is allowed", role),
            DecisionReason::NotListed => write!(f, "no matching role is allowed"),
        }
    }
}

/// An access outcome together with the reason that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub access: Access,
    pub reason: DecisionReason,
}

impl Decision {
    fn allow(reason: DecisionReason) -> Self {
        Self {
            access: Access::Allow,
            reason,
        }
    }

    fn deny(reason: DecisionReason) -> Self {
        Self {
            access: Access::Deny,
            reason,
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.access.is_allowed()
    }
}

/// Checks a single role against a rule.
///
/// Precedence, highest first: `disallowed` denies, `allow_all` allows, `allowed`
/// allows, anything else is denied. Unknown roles are treated like any other
/// unlisted role.
///
/// ```
/// use routegraph::rule::{evaluate, Access, Role, Rule};
///
/// let rule = Rule::allow_all().deny("Guest");
/// assert_eq!(evaluate(&rule, &Role::from("Admin")), Access::Allow);
/// assert_eq!(evaluate(&rule, &Role::from("Guest")), Access::Deny);
/// ```
pub fn evaluate(rule: &Rule, role: &Role) -> Access {
    explain(rule, role).access
}

/// Like [`evaluate`], but also reports which precedence step decided.
pub fn explain(rule: &Rule, role: &Role) -> Decision {
    evaluate_roles(rule, std::slice::from_ref(role))
}

/// Checks a caller holding several roles against a rule.
///
/// Any disallowed role denies the whole request, even if another role is allowed.
/// Otherwise the request passes under `allow_all` or when at least one role is in
/// `allowed`. An empty role list only passes under `allow_all`.
pub fn evaluate_roles<'a>(rule: &Rule, roles: impl IntoIterator<Item = &'a Role>) -> Decision {
    let mut first_allowed = None;
    for role in roles {
        if rule.disallowed.contains(role) {
            return Decision::deny(DecisionReason::Disallowed(role.clone()));
        }
        if first_allowed.is_none() && rule.allowed.contains(role) {
            first_allowed = Some(role);
        }
    }

    if rule.allow_all {
        return Decision::allow(DecisionReason::AllowAll);
    }
    match first_allowed {
        Some(role) => Decision::allow(DecisionReason::Allowed(role.clone())),
        None => Decision::deny(DecisionReason::NotListed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(name: &str) -> Role {
        Role::from(name)
    }

    #[test]
    fn disallowed_beats_allow_all() {
        let rule = Rule::allow_all().allow("Admin").deny("Admin");
        let decision = explain(&rule, &role("Admin"));
        assert_eq!(decision.access, Access::Deny);
        assert_eq!(decision.reason, DecisionReason::Disallowed(role("Admin")));
    }

    #[test]
    fn allow_all_ignores_allowed_list() {
        let rule = Rule::allow_all().allow("Admin");
        let decision = explain(&rule, &role("Intern"));
        assert_eq!(decision.access, Access::Allow);
        assert_eq!(decision.reason, DecisionReason::AllowAll);
    }

    #[test]
    fn unknown_role_is_denied_without_allow_all() {
        let rule = Rule::deny_all().allow("Admin");
        assert_eq!(evaluate(&rule, &role("Nobody")), Access::Deny);
    }

    #[test]
    fn one_disallowed_role_denies_the_caller() {
        let rule = Rule::deny_all().allow("Admin").deny("Guest");
        let roles = [role("Admin"), role("Guest")];
        let decision = evaluate_roles(&rule, &roles);
        assert_eq!(decision.reason, DecisionReason::Disallowed(role("Guest")));
    }

    #[test]
    fn empty_role_list() {
        let none: [Role; 0] = [];
        assert!(!evaluate_roles(&Rule::deny_all(), &none).is_allowed());
        assert!(evaluate_roles(&Rule::allow_all(), &none).is_allowed());
    }

    #[test]
    fn reason_display() {
        assert_eq!(
            DecisionReason::Disallowed(role("Guest")).to_string(),
            "role 'Guest' is disallowed"
        );
        assert_eq!(DecisionReason::NotListed.to_string(), "no matching role is allowed");
    }
}
