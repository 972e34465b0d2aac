//! Shared outcome types for the generation gateway
//!
//! Every gateway service answers with a `Generated<T>`: either the provider's
//! result, or a deterministic placeholder together with the reason the
//! provider could not be used. Only caller misuse and missing mandatory
//! credentials are reported as `GatewayError`.

/// Why a placeholder was used instead of a provider result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No credential for the provider
    NotConfigured,
    /// Provider rejected the credential (401/403)
    Unauthorized,
    /// Provider reported a rate or usage limit
    QuotaExceeded,
    /// Provider answered with a non-success status
    Provider(String),
    /// Request never completed
    Transport(String),
    /// Provider answered successfully but the payload was unusable
    Malformed(String),
}

impl FallbackReason {
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded)
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "provider not configured"),
            Self::Unauthorized => write!(f, "provider rejected credentials"),
            Self::QuotaExceeded => write!(f, "provider quota exceeded"),
            Self::Provider(message) => write!(f, "provider error: {}", message),
            Self::Transport(message) => write!(f, "transport error: {}", message),
            Self::Malformed(message) => write!(f, "malformed response: {}", message),
        }
    }
}

/// Result of a gateway call
#[derive(Debug, Clone, PartialEq)]
pub enum Generated<T> {
    Success(T),
    Fallback { reason: FallbackReason, placeholder: T },
}

impl<T> Generated<T> {
    pub fn fallback(reason: FallbackReason, placeholder: T) -> Self {
        Self::Fallback {
            reason,
            placeholder,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Self::Success(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Success(value) => value,
            Self::Fallback { placeholder, .. } => placeholder,
        }
    }

    /// The provider result or the placeholder, whichever is present
    pub fn into_inner(self) -> T {
        match self {
            Self::Success(value) => value,
            Self::Fallback { placeholder, .. } => placeholder,
        }
    }
}

/// Errors the gateway does not turn into a placeholder
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    /// A mandatory provider credential is missing
    #[error("{0} API key not configured")]
    NotConfigured(&'static str),
    /// The caller sent an unusable request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
