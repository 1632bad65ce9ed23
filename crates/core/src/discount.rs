//! Discount code generation.
//!
//! Every enrollment gets a code at creation time, delivered in the welcome
//! email and redeemable against the products in the frozen snapshot. The
//! prefix ties the code back to the challenge for support lookups; the
//! random suffix keeps codes unguessable. Codes are not checked for
//! uniqueness at this volume.

use rand::Rng;

/// Number of slug characters used for the human-readable prefix.
pub const CODE_PREFIX_LENGTH: usize = 4;

/// Number of random characters in the code suffix.
pub const CODE_SUFFIX_LENGTH: usize = 6;

/// Characters eligible for the random suffix. Uppercase plus digits so
/// codes survive being read aloud or typed from an email.
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a discount code for a challenge slug.
///
/// The prefix is the first [`CODE_PREFIX_LENGTH`] alphabetic characters of
/// the slug, uppercased. Slugs with fewer alphabetic characters produce a
/// shorter prefix rather than padding.
pub fn generate_discount_code(slug: &str) -> String {
    let prefix: String = slug
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(CODE_PREFIX_LENGTH)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let mut rng = rand::rng();
    let suffix: String = (0..CODE_SUFFIX_LENGTH)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect();

    format!("{prefix}-{suffix}")
}
