use sha1::{Digest, Sha1};

/// Hex-encoded SHA1 of an in-memory payload
pub fn compute_sha1_bytes(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Builds the canonical `k=v&k=v` string for request signing.
///
/// Keys are sorted, parameters with empty values are left out.
pub fn string_to_sign(params: &[(&str, String)]) -> String {
    let mut sorted: Vec<_> = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Signs request parameters with the account secret (SHA1 over params + secret)
pub fn sign_params(params: &[(&str, String)], secret: &str) -> String {
    let mut payload = string_to_sign(params);
    payload.push_str(secret);
    compute_sha1_bytes(payload.as_bytes())
}
