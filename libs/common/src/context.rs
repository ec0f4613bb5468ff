//! Per-call identity context

use crate::error::{CommunityError, CommunityResult};

/// Header carrying the caller identity set by the identity gateway
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity of the caller, passed explicitly into every operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    user_id: Option<String>,
}

impl RequestContext {
    /// Context for an authenticated caller
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let user_id = user_id.trim();
        Self {
            user_id: (!user_id.is_empty()).then(|| user_id.to_string()),
        }
    }

    /// Context without identity
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Caller identity, if any
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Resolve the acting user, substituting `fallback` when the caller has none
    pub fn resolve_user_id(&self, fallback: Option<&str>) -> CommunityResult<String> {
        self.user_id()
            .or(fallback)
            .map(str::to_string)
            .ok_or(CommunityError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_identity_wins_over_fallback() {
        let ctx = RequestContext::authenticated("user42");
        assert_eq!(ctx.resolve_user_id(Some("mock-user-id")).unwrap(), "user42");
    }

    #[test]
    fn test_fallback_used_for_anonymous_caller() {
        let ctx = RequestContext::anonymous();
        assert_eq!(
            ctx.resolve_user_id(Some("mock-user-id")).unwrap(),
            "mock-user-id"
        );
    }

    #[test]
    fn test_no_identity_is_unauthenticated() {
        let ctx = RequestContext::authenticated("   ");
        assert!(matches!(
            ctx.resolve_user_id(None),
            Err(CommunityError::Unauthenticated)
        ));
    }

    #[test]
    fn test_padded_identity_is_trimmed() {
        let ctx = RequestContext::authenticated(" user1 ");
        assert_eq!(ctx.user_id(), Some("user1"));
        assert_eq!(ctx.resolve_user_id(None).unwrap(), "user1");
    }
}
