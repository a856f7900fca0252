#![forbid(unsafe_code)]

//! Small helpers shared by the engine and hosts.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use web_time::{SystemTime, UNIX_EPOCH};

const UUID_TEMPLATE: &str = "xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx";

/// Normalize a CSS class prefix so it can be concatenated directly.
///
/// `None` and `""` give `""`; anything else gets exactly one trailing `-`.
pub fn normalize_prefix(prefix: Option<&str>) -> String {
    match prefix {
        Some(p) if !p.is_empty() => {
            if p.ends_with('-') {
                p.to_owned()
            } else {
                format!("{p}-")
            }
        }
        _ => String::new(),
    }
}

/// A random RFC 4122 version-4 shaped identifier. Not cryptographically
/// strong; only meant to keep ids apart within a page.
pub fn uuid() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    uuid_from_seed(millis ^ n.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Deterministic [`uuid`] for a given seed.
pub fn uuid_from_seed(seed: u64) -> String {
    let mut rng = SmallRng::seed_from_u64(seed);
    UUID_TEMPLATE
        .chars()
        .map(|c| match c {
            'x' => hex_digit(rng.random_range(0..16)),
            'y' => hex_digit((rng.random_range(0..16) & 0x3) | 0x8),
            other => other,
        })
        .collect()
}

fn hex_digit(v: u32) -> char {
    char::from_digit(v, 16).unwrap_or('0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_cases() {
        assert_eq!(normalize_prefix(None), "");
        assert_eq!(normalize_prefix(Some("")), "");
        assert_eq!(normalize_prefix(Some("acme")), "acme-");
        assert_eq!(normalize_prefix(Some("acme-")), "acme-");
        assert_eq!(normalize_prefix(Some("-")), "-");
    }

    #[test]
    fn seeded_uuid_is_stable() {
        assert_eq!(uuid_from_seed(7), uuid_from_seed(7));
        assert_ne!(uuid_from_seed(7), uuid_from_seed(8));
    }

    #[test]
    fn consecutive_uuids_differ() {
        assert_ne!(uuid(), uuid());
    }
}
