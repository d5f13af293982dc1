/// Activation-key generation
///
/// Every purchase carries a 16-character alphanumeric activation key. The
/// generator is a pure function over the process RNG: it has no side effects
/// and makes no uniqueness guarantee across the purchases table. The keyspace
/// is 62^16, so callers treat collisions as negligible rather than checking
/// the store; a key is only ever compared against the single purchase row it
/// was issued for.

use rand::Rng;

/// Length of every activation key, in characters
pub const KEY_LENGTH: usize = 16;

/// Alphabet the keys are drawn from (upper, lower, digits)
const KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates a fresh activation key
///
/// Uniformly samples [`KEY_LENGTH`] characters from [A-Za-z0-9].
pub fn generate_key() -> String {
    let mut rng = rand::thread_rng();
    (0..KEY_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..KEY_ALPHABET.len());
            KEY_ALPHABET[idx] as char
        })
        .collect()
}
