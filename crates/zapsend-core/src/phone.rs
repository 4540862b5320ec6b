// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone number normalization into the gateway's canonical digit form.

/// Country code prepended to numbers that carry none (Brazil).
pub const DEFAULT_COUNTRY_CODE: &str = "55";

/// Longest digit count that is still treated as a national number.
const MAX_NATIONAL_DIGITS: usize = 11;

/// Normalizes `raw` using [`DEFAULT_COUNTRY_CODE`].
pub fn normalize_phone(raw: &str) -> String {
    normalize_phone_with(raw, DEFAULT_COUNTRY_CODE)
}

/// Normalizes `raw` into digits only, dropping a single leading trunk zero and
/// prepending `country_code` when the remaining number is too short to
/// already contain one.
///
/// Total over any input: malformed numbers yield a possibly-invalid digit
/// string for the gateway to reject.
pub fn normalize_phone_with(raw: &str, country_code: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let national = digits.strip_prefix('0').unwrap_or(&digits);

    if national.len() <= MAX_NATIONAL_DIGITS {
        format!("{country_code}{national}")
    } else {
        national.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trunk_zero_is_dropped_and_country_code_added() {
        assert_eq!(normalize_phone("061999999999"), "5561999999999");
    }

    #[test]
    fn canonical_input_is_unchanged() {
        assert_eq!(normalize_phone("5561999999999"), "5561999999999");
        assert_eq!(
            normalize_phone(&normalize_phone("(61) 99999-9999")),
            normalize_phone("(61) 99999-9999")
        );
    }

    #[test]
    fn punctuation_is_stripped() {
        assert_eq!(normalize_phone("+55 (61) 99999-9999"), "5561999999999");
        assert_eq!(normalize_phone("(61) 3333-4444"), "556133334444");
    }

    #[test]
    fn result_is_digits_with_country_code_for_realistic_inputs() {
        for raw in [
            "61 99999 9999",
            "0 61 3333 4444",
            "+55 11 98888-7777",
            "11987654321",
            "tel: 61-3333-4444",
        ] {
            let normalized = normalize_phone(raw);
            assert!(normalized.chars().all(|c| c.is_ascii_digit()), "{raw} -> {normalized}");
            assert!(normalized.len() >= 12, "{raw} -> {normalized}");
        }
    }

    #[test]
    fn garbage_input_never_panics() {
        assert_eq!(normalize_phone(""), "55");
        assert_eq!(normalize_phone("N/A"), "55");
        assert_eq!(normalize_phone("0"), "55");
    }

    #[test]
    fn custom_country_code() {
        assert_eq!(normalize_phone_with("(212) 555-0100", "1"), "12125550100");
    }
}
