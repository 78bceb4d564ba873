//! User-facing wording for submission and confirmation errors.

pub const INSUFFICIENT_FUNDS: &str = "Insufficient funds to cover the transfer and gas fees";
pub const NETWORK_FAILURE: &str = "Network error. Please check your connection and try again";

const NETWORK_PHRASES: [&str; 3] = ["network error", "failed to fetch", "error sending request"];

/// Map a raw chain client error to banner text.
///
/// Known phrases get canned wording; everything else is shown verbatim.
pub fn friendly_error(raw: &str) -> String {
    let lower = raw.to_lowercase();
    if lower.contains("insufficient funds") {
        INSUFFICIENT_FUNDS.to_string()
    } else if NETWORK_PHRASES.iter().any(|p| lower.contains(p)) {
        NETWORK_FAILURE.to_string()
    } else {
        raw.to_string()
    }
}
