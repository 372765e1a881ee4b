use serde::Serialize;

/// Why access was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Grant {
    /// Teacher or admin role; subscriptions were not consulted.
    RoleBypass,
    /// The feature sits on the free allowlist.
    FreeFeature,
    /// A currently valid premium subscription.
    PremiumSubscription,
}

/// Outcome of one entitlement evaluation. The three variants are mutually
/// exclusive; the guard branches on nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed(Grant),
    /// Authenticated, but no qualifying subscription. Surfaced as an
    /// upgrade prompt.
    Denied,
    /// No user at all. Surfaced as a sign-in prompt.
    Unauthenticated,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed(_))
    }

    /// Whether access came purely from role, independent of subscription.
    pub fn bypass(&self) -> bool {
        matches!(self, AccessDecision::Allowed(Grant::RoleBypass))
    }

    pub fn grant(&self) -> Option<Grant> {
        match self {
            AccessDecision::Allowed(grant) => Some(*grant),
            _ => None,
        }
    }

    pub fn outcome_str(&self) -> &'static str {
        match self {
            AccessDecision::Allowed(_) => "allowed",
            AccessDecision::Denied => "denied",
            AccessDecision::Unauthenticated => "unauthenticated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bypass_only_for_role_grants() {
        assert!(AccessDecision::Allowed(Grant::RoleBypass).bypass());
        assert!(!AccessDecision::Allowed(Grant::FreeFeature).bypass());
        assert!(!AccessDecision::Allowed(Grant::PremiumSubscription).bypass());
        assert!(!AccessDecision::Denied.bypass());
    }

    #[test]
    fn allowed_carries_its_grant() {
        assert_eq!(
            AccessDecision::Allowed(Grant::FreeFeature).grant(),
            Some(Grant::FreeFeature)
        );
        assert_eq!(AccessDecision::Unauthenticated.grant(), None);
    }
}
