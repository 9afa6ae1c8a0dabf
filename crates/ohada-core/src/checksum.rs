//! # Checksum Algorithms
//!
//! Standalone check-digit schemes used on bank and product references.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  IBAN (ISO 7064 mod-97-10)                                              │
//! │                                                                         │
//! │   SN08 SN01 0015 2000 0485 0000 3035                                   │
//! │   ────                                                                  │
//! │    │   move the first 4 chars to the end                               │
//! │    ▼                                                                    │
//! │   SN0100152000048500003035 SN08                                        │
//! │    │   letters → two digits (A=10 … Z=35)                              │
//! │    ▼                                                                    │
//! │   2823 0100152000048500003035 282308                                   │
//! │    │   reduce mod 97 chunk by chunk (u32 only, no big integers)        │
//! │    ▼                                                                    │
//! │   remainder == 1  ⇒ valid                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All functions are total: malformed input is `false` / `None`, never a panic.

/// Shortest IBAN in use (Norway).
pub const IBAN_MIN_LENGTH: usize = 15;

/// Longest IBAN allowed by ISO 13616.
pub const IBAN_MAX_LENGTH: usize = 34;

/// 97 * 10^7 stays far below u32::MAX, so 7-digit chunks are safe.
const MOD97_CHUNK: usize = 7;

// =============================================================================
// IBAN
// =============================================================================

/// Normalizes an IBAN: strips whitespace, uppercases.
pub fn normalize_iban(iban: &str) -> String {
    iban.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Checks an IBAN with the mod-97 rule.
///
/// ## Rules
/// - Whitespace is ignored, case is ignored
/// - Shape: 2 letters, 2 digits, then letters/digits
/// - Length between 15 and 34
/// - Rearranged numeric form mod 97 must be 1
///
/// ## Example
/// ```rust
/// use ohada_core::checksum::is_valid_iban;
///
/// assert!(is_valid_iban("SN08 SN01 0015 2000 0485 0000 3035"));
/// assert!(is_valid_iban("gb82 west 1234 5698 7654 32"));
/// assert!(!is_valid_iban("GB82 WEST 1234 5698 7654 33"));
/// ```
pub fn is_valid_iban(iban: &str) -> bool {
    let iban = normalize_iban(iban);
    if !has_iban_shape(&iban) {
        return false;
    }

    let rearranged = format!("{}{}", &iban[4..], &iban[..4]);
    mod97(&rearranged) == Some(1)
}

/// Computes the two IBAN check digits for a country code and BBAN.
///
/// ## Example
/// ```rust
/// use ohada_core::checksum::iban_check_digits;
///
/// assert_eq!(iban_check_digits("SN", "SN0100152000048500003035").as_deref(), Some("08"));
/// ```
pub fn iban_check_digits(country: &str, bban: &str) -> Option<String> {
    let country = country.to_ascii_uppercase();
    let bban = normalize_iban(bban);

    if country.len() != 2 || !country.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    if bban.is_empty() || !bban.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) {
        return None;
    }

    let remainder = mod97(&format!("{}{}00", bban, country))?;
    Some(format!("{:02}", 98 - remainder))
}

fn has_iban_shape(iban: &str) -> bool {
    let bytes = iban.as_bytes();
    if bytes.len() < IBAN_MIN_LENGTH || bytes.len() > IBAN_MAX_LENGTH {
        return false;
    }

    bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..4].iter().all(u8::is_ascii_digit)
        && bytes[4..]
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Letters become `code - 55`, digits stay; reduced mod 97 in chunks.
///
/// Returns `None` if any character is not `[0-9A-Z]`.
fn mod97(input: &str) -> Option<u32> {
    let mut digits = String::with_capacity(input.len() * 2);
    for b in input.bytes() {
        match b {
            b'0'..=b'9' => digits.push(b as char),
            b'A'..=b'Z' => digits.push_str(&(b as u32 - 55).to_string()),
            _ => return None,
        }
    }

    let mut remainder: u32 = 0;
    for chunk in digits.as_bytes().chunks(MOD97_CHUNK) {
        let mut block = remainder;
        for d in chunk {
            block = block * 10 + (d - b'0') as u32;
        }
        remainder = block % 97;
    }
    Some(remainder)
}

// =============================================================================
// EAN-13
// =============================================================================

/// Computes the EAN-13 check digit of a 12-digit prefix.
///
/// Weights alternate 1, 3, 1, 3, ... starting from the first digit.
pub fn ean13_check_digit(prefix: &str) -> Option<u8> {
    let bytes = prefix.as_bytes();
    if bytes.len() != 12 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let sum: u32 = bytes
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let digit = (b - b'0') as u32;
            if i % 2 == 0 {
                digit
            } else {
                digit * 3
            }
        })
        .sum();

    Some(((10 - sum % 10) % 10) as u8)
}

/// Checks a 13-digit EAN barcode.
///
/// ## Example
/// ```rust
/// use ohada_core::checksum::is_valid_ean13;
///
/// assert!(is_valid_ean13("4006381333931"));
/// assert!(!is_valid_ean13("4006381333932"));
/// assert!(!is_valid_ean13("400638133393"));
/// ```
pub fn is_valid_ean13(barcode: &str) -> bool {
    let bytes = barcode.as_bytes();
    if bytes.len() != 13 || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }

    ean13_check_digit(&barcode[..12]) == Some(bytes[12] - b'0')
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VALID_IBANS: &[&str] = &[
        "SN08SN0100152000048500003035",
        "CI93CI0080111301134291200589",
        "GB82WEST12345698765432",
        "DE89370400440532013000",
        "FR1420041010050500013M02606",
        "BE68539007547034",
        "MR1300020001010000123456753",
    ];

    #[test]
    fn test_known_ibans_are_valid() {
        for iban in VALID_IBANS {
            assert!(is_valid_iban(iban), "{} should be valid", iban);
        }
    }

    #[test]
    fn test_iban_formatting_is_ignored() {
        assert!(is_valid_iban("FR14 2004 1010 0505 0001 3M02 606"));
        assert!(is_valid_iban("  fr1420041010050500013m02606\t"));
    }

    #[test]
    fn test_iban_shape_rejections() {
        assert!(!is_valid_iban(""));
        assert!(!is_valid_iban("NO938601111794")); // 14 chars, too short
        assert!(!is_valid_iban("1B82WEST12345698765432"));
        assert!(!is_valid_iban("GBX2WEST12345698765432"));
        assert!(!is_valid_iban("GB82WEST1234569876543-"));
        assert!(!is_valid_iban("GB82WÉST12345698765432"));
    }

    #[test]
    fn test_iban_length_boundary() {
        let bban = "ABCDEFGHIJ0123456789KLMNOPQRST";
        let check = iban_check_digits("FR", bban).unwrap();
        assert_eq!(check, "18");

        let max = format!("FR{}{}", check, bban);
        assert_eq!(max.len(), IBAN_MAX_LENGTH);
        assert!(is_valid_iban(&max));

        let too_long = format!("FR{}{}U", check, bban);
        assert!(!is_valid_iban(&too_long));
    }

    #[test]
    fn test_every_single_character_mutation_is_caught() {
        for iban in VALID_IBANS {
            let original: Vec<char> = iban.chars().collect();
            for pos in 0..original.len() {
                let replacements: Vec<char> = if original[pos].is_ascii_digit() {
                    ('0'..='9').collect()
                } else {
                    ('A'..='Z').collect()
                };
                for replacement in replacements {
                    if replacement == original[pos] {
                        continue;
                    }
                    let mut mutated = original.clone();
                    mutated[pos] = replacement;
                    let mutated: String = mutated.into_iter().collect();
                    assert!(!is_valid_iban(&mutated), "{} should be rejected", mutated);
                }
            }
        }
    }

    #[test]
    fn test_iban_check_digits_rejects_garbage() {
        assert_eq!(iban_check_digits("S", "123"), None);
        assert_eq!(iban_check_digits("SN", ""), None);
        assert_eq!(iban_check_digits("SN", "12-34"), None);
    }

    #[test]
    fn test_known_eans() {
        assert!(is_valid_ean13("4006381333931"));
        assert!(is_valid_ean13("5901234123457"));
        assert!(is_valid_ean13("3017620422003"));
        assert!(!is_valid_ean13("6111234567890"));
    }

    #[test]
    fn test_ean_shape_rejections() {
        assert!(!is_valid_ean13(""));
        assert!(!is_valid_ean13("400638133393"));
        assert!(!is_valid_ean13("40063813339310"));
        assert!(!is_valid_ean13("40063813339a1"));
        assert_eq!(ean13_check_digit("12345"), None);
    }

    proptest! {
        /// Property: the computed check digit validates, every other digit fails.
        #[test]
        fn ean13_check_digit_round_trip(prefix in "[0-9]{12}") {
            let check = ean13_check_digit(&prefix).unwrap();
            for candidate in 0u8..10 {
                let barcode = format!("{}{}", prefix, candidate);
                prop_assert_eq!(is_valid_ean13(&barcode), candidate == check);
            }
        }

        /// Property: IBANs built with computed check digits always validate.
        #[test]
        fn iban_built_from_check_digits_validates(
            country in "[A-Z]{2}",
            bban in "[A-Z0-9]{11,30}",
        ) {
            let check = iban_check_digits(&country, &bban).unwrap();
            let iban = format!("{}{}{}", country, check, bban);
            prop_assert!(is_valid_iban(&iban));
        }
    }
}
