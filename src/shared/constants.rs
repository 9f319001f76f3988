/// Default number of items returned by list endpoints
pub const DEFAULT_LIST_LIMIT: i64 = 20;

/// Maximum number of items per request on list endpoints
pub const MAX_LIST_LIMIT: i64 = 100;

// =============================================================================
// ACCOUNT PROVIDER CONSTANTS
// =============================================================================

/// Email/password accounts; account_id mirrors the user id
pub const PROVIDER_CREDENTIAL: &str = "credential";

/// Google sign-in accounts; account_id holds the Google subject
pub const PROVIDER_GOOGLE: &str = "google";

/// Email verification tokens expire after this many hours
pub const VERIFICATION_TTL_HOURS: i64 = 24;

/// Persisted when Gemini answers without any candidate text
pub const FALLBACK_EXPLANATION: &str = "No explanation generated.";
