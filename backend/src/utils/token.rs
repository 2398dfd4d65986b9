use rand::{rngs::OsRng, Rng};

const TOKEN_LENGTH: usize = 64;
const TOKEN_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates an opaque session token: 64 characters drawn uniformly from
/// the alphanumeric alphabet, using the operating system's CSPRNG.
pub fn generate_session_token() -> String {
    let mut rng = OsRng;
    (0..TOKEN_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..TOKEN_ALPHABET.len());
            TOKEN_ALPHABET[idx] as char
        })
        .collect()
}
