// Env values used in cofecms.
pub const COFECMS_API_ID: &str = "COFECMS_API_ID";
pub const COFECMS_API_KEY: &str = "COFECMS_API_KEY";
pub const COFECMS_DIOCESE_ID: &str = "COFECMS_DIOCESE_ID";
pub const COFECMS_ENDPOINT: &str = "COFECMS_ENDPOINT";

/// Base url of the hosted CMS API.
pub const DEFAULT_ENDPOINT: &str = "https://cmsapi.cofeportal.org";

/// Page size used by paginated calls when the caller sets none.
pub const DEFAULT_LIMIT: u64 = 100;

// Response headers.
pub const X_RATE_LIMIT: &str = "x-rate-limit";
pub const X_RATE_LIMIT_REMAINING: &str = "x-rate-limit-remaining";
pub const X_TOTAL_COUNT: &str = "x-total-count";

// Query keys added while signing, callers may not use them.
pub const API_ID: &str = "api_id";
pub const DATA: &str = "data";
pub const SIG: &str = "sig";

// Basic params with special handling.
pub const OFFSET: &str = "offset";
pub const LIMIT: &str = "limit";
pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const FIELDS: &str = "fields";

/// Search criterion carrying the tenant scope.
pub const DIOCESE_ID: &str = "diocese_id";
