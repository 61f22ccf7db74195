//! Identity helpers shared by the role resolver, the session store and the audit trail.

/// Number of leading token characters kept when a token is written to logs or the audit trail.
pub const TOKEN_FRAGMENT_LEN: usize = 8;

/// Canonical form of a subject email: trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns a short, non-secret prefix of a session token for correlation.
///
/// The full token never leaves the store; logs and audit rows only carry this fragment.
pub fn token_fragment(token: &str) -> String {
    let prefix: String = token.chars().take(TOKEN_FRAGMENT_LEN).collect();
    format!("{prefix}...")
}
