//! Root endpoint: a fixed plaintext greeting.

/// Body served at `/`. The deployed service's smoke tests match this exactly.
pub const GREETING: &str = "Hello from Free Tier POC!";

/// Root handler. Stateless; identical requests yield byte-identical bodies.
pub async fn index() -> &'static str {
    GREETING
}
