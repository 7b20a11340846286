//! Login nonce generation

pub fn generate_nonce() -> String {
    let bytes: [u8; 16] = rand::random();
    hex::encode(bytes)
}

pub fn nonce_matches(nonce: &str, expected: &str) -> bool {
    !expected.is_empty() && nonce == expected
}
