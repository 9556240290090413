//! Page size policy.

/// Bounds applied to requested page sizes.
///
/// Out-of-range requests are clamped, never rejected: callers may ask for any
/// limit and rely on getting at most `max_limit` rows back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitPolicy {
    /// Page size used when the request has none.
    pub default_limit: u32,
    /// Largest page size ever returned.
    pub max_limit: u32,
}

impl LimitPolicy {
    /// Default page size.
    pub const DEFAULT_LIMIT: u32 = 25;
    /// Default page size cap.
    pub const MAX_LIMIT: u32 = 100;

    /// Create a policy with the given bounds.
    pub fn new(default_limit: u32, max_limit: u32) -> Self {
        Self {
            default_limit,
            max_limit,
        }
    }

    /// Clamp a requested limit into `1..=max_limit`.
    pub fn clamp(&self, requested: Option<i64>) -> u32 {
        let max = self.max_limit.max(1);
        match requested {
            None => self.default_limit.clamp(1, max),
            Some(n) if n < 1 => 1,
            Some(n) => u32::try_from(n).unwrap_or(u32::MAX).min(max),
        }
    }
}

impl Default for LimitPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, Self::MAX_LIMIT)
    }
}
