//! Fabrication primitives shared by the generation stages.
//!
//! Thin wrappers over `fake` and `rand` so every stage draws values the same
//! way. Everything here takes `&mut StdRng` — nothing touches ambient
//! randomness, which is what keeps a seed reproducible.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use fake::faker::address::en::{BuildingNumber, CityName, StateName, StreetName, ZipCode};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::{Sentence, Sentences, Word, Words};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::rngs::StdRng;
use rand::Rng;

pub fn first_name(rng: &mut StdRng) -> String {
    FirstName().fake_with_rng(rng)
}

pub fn last_name(rng: &mut StdRng) -> String {
    LastName().fake_with_rng(rng)
}

pub fn full_name(rng: &mut StdRng) -> String {
    Name().fake_with_rng(rng)
}

/// Email derived from a person's name, with a random suffix to keep the
/// collision rate low before [`UniqueSet`](super::unique::UniqueSet) retries
/// kick in.
pub fn email_for(rng: &mut StdRng, first: &str, last: &str, domain: &str) -> String {
    let suffix: u32 = rng.random_range(1..10_000);
    format!(
        "{}.{}{}@{}",
        first.to_lowercase().replace([' ', '\''], ""),
        last.to_lowercase().replace([' ', '\''], ""),
        suffix,
        domain
    )
}

pub fn safe_email(rng: &mut StdRng) -> String {
    SafeEmail().fake_with_rng(rng)
}

pub fn phone_number(rng: &mut StdRng) -> String {
    PhoneNumber().fake_with_rng(rng)
}

pub fn company_name(rng: &mut StdRng) -> String {
    CompanyName().fake_with_rng(rng)
}

/// One-line street address: "1234 Maple Street".
pub fn street_address(rng: &mut StdRng) -> String {
    let number: String = BuildingNumber().fake_with_rng(rng);
    let street: String = StreetName().fake_with_rng(rng);
    format!("{} {}", number, street)
}

pub fn city(rng: &mut StdRng) -> String {
    CityName().fake_with_rng(rng)
}

pub fn state(rng: &mut StdRng) -> String {
    StateName().fake_with_rng(rng)
}

pub fn postal_code(rng: &mut StdRng) -> String {
    ZipCode().fake_with_rng(rng)
}

pub fn word(rng: &mut StdRng) -> String {
    Word().fake_with_rng(rng)
}

pub fn words(rng: &mut StdRng, count: std::ops::Range<usize>) -> String {
    let parts: Vec<String> = Words(count).fake_with_rng(rng);
    parts.join(" ")
}

pub fn sentence(rng: &mut StdRng, word_count: std::ops::Range<usize>) -> String {
    Sentence(word_count).fake_with_rng(rng)
}

pub fn paragraph(rng: &mut StdRng, sentence_count: std::ops::Range<usize>) -> String {
    let parts: Vec<String> = Sentences(sentence_count).fake_with_rng(rng);
    parts.join(" ")
}

/// Uniform datetime in `[start, end]`, second resolution.
pub fn datetime_between(rng: &mut StdRng, start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
    let span = (end - start).num_seconds().max(0);
    start + Duration::seconds(rng.random_range(0..=span))
}

/// Uniform date in `[start, end]`.
pub fn date_between(rng: &mut StdRng, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days().max(0);
    start + Duration::days(rng.random_range(0..=span))
}

/// Pick an index from a weighted distribution by cumulative scan.
///
/// Weights must be non-negative with a positive sum (config validation
/// guarantees this for the built-in weight tables).
pub fn weighted_index(rng: &mut StdRng, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    let mut roll = rng.random_range(0.0..total);
    for (i, w) in weights.iter().enumerate() {
        if roll < *w {
            return i;
        }
        roll -= w;
    }
    weights.len() - 1
}

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Uppercase alphanumeric string of the given length.
pub fn alphanumeric(rng: &mut StdRng, len: usize) -> String {
    (0..len)
        .map(|_| ALPHANUMERIC[rng.random_range(0..ALPHANUMERIC.len())] as char)
        .collect()
}

/// Stock-keeping unit: "SKU-48213".
pub fn sku(rng: &mut StdRng) -> String {
    format!("SKU-{}", rng.random_range(10_000..100_000))
}

/// Carrier tracking number: "TRK" + 12 alphanumerics.
pub fn tracking_number(rng: &mut StdRng) -> String {
    format!("TRK{}", alphanumeric(rng, 12))
}

/// UUID built from RNG bytes, so transaction ids reproduce with the seed.
/// (`Uuid::new_v4` draws from the OS and would break determinism.)
pub fn seeded_uuid(rng: &mut StdRng) -> String {
    let bytes: [u8; 16] = rng.random();
    uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_same_seed_same_values() {
        let mut a = rng();
        let mut b = rng();
        assert_eq!(full_name(&mut a), full_name(&mut b));
        assert_eq!(sku(&mut a), sku(&mut b));
        assert_eq!(seeded_uuid(&mut a), seeded_uuid(&mut b));
    }

    #[test]
    fn test_datetime_between_bounds() {
        let mut r = rng();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap().and_hms_opt(23, 59, 59).unwrap();
        for _ in 0..100 {
            let dt = datetime_between(&mut r, start, end);
            assert!(dt >= start && dt <= end);
        }
    }

    #[test]
    fn test_datetime_between_collapsed_range() {
        let mut r = rng();
        let point = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(datetime_between(&mut r, point, point), point);
    }

    #[test]
    fn test_weighted_index_degenerate() {
        let mut r = rng();
        for _ in 0..50 {
            assert_eq!(weighted_index(&mut r, &[0.0, 0.0, 1.0, 0.0]), 2);
        }
    }

    #[test]
    fn test_weighted_index_covers_all() {
        let mut r = rng();
        let mut seen = [false; 3];
        for _ in 0..500 {
            seen[weighted_index(&mut r, &[1.0, 1.0, 1.0])] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_sku_shape() {
        let mut r = rng();
        let s = sku(&mut r);
        assert!(s.starts_with("SKU-"));
        assert_eq!(s.len(), 9);
    }

    #[test]
    fn test_tracking_number_shape() {
        let mut r = rng();
        let t = tracking_number(&mut r);
        assert!(t.starts_with("TRK"));
        assert_eq!(t.len(), 15);
        assert!(t.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_email_for_shape() {
        let mut r = rng();
        let e = email_for(&mut r, "Mary Anne", "O'Brien", "example.com");
        assert!(e.ends_with("@example.com"));
        assert!(!e.contains(' '));
        assert!(!e.contains('\''));
    }
}
