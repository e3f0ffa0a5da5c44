//! Country/IBAN registry.
//!
//! A fixed set of ISO 3166-1 alpha-2 codes for countries that issue IBANs.
//! The set is a versioned constant: account-representation decisions key
//! off membership, so tests pin its exact contents.

/// Countries known to issue IBANs.
pub const IBAN_COUNTRIES: &[&str] = &[
    "AD", "AE", "AL", "AT", "AZ", "BA", "BE", "BG", "BH", "BR", "BY", "CH",
    "CR", "CY", "CZ", "DE", "DK", "DO", "EE", "EG", "ES", "FI", "FO", "FR",
    "GB", "GE", "GI", "GL", "GR", "GT", "HR", "HU", "IE", "IL", "IS", "IT",
    "JO", "KW", "KZ", "LB", "LC", "LI", "LT", "LU", "LV", "MC", "MD", "ME",
    "MK", "MR", "MT", "MU", "NL", "NO", "PK", "PL", "PS", "PT", "QA", "RO",
    "RS", "SA", "SE", "SI", "SK", "SM", "TN", "TR", "UA", "VG", "XK",
];

/// Check whether a country code belongs to the IBAN area.
///
/// Matching is case-insensitive; unknown or malformed codes return false.
pub fn is_iban_country(code: &str) -> bool {
    let upper = code.to_uppercase();
    IBAN_COUNTRIES.contains(&upper.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_is_case_insensitive() {
        assert!(is_iban_country("DE"));
        assert!(is_iban_country("de"));
        assert!(is_iban_country("Gb"));
    }

    #[test]
    fn test_non_iban_countries() {
        assert!(!is_iban_country("US"));
        assert!(!is_iban_country("CN"));
        assert!(!is_iban_country(""));
        assert!(!is_iban_country("DEU"));
    }

    #[test]
    fn test_registry_membership_is_pinned() {
        assert_eq!(IBAN_COUNTRIES.len(), 71);
        for code in ["AD", "FR", "NL", "SA", "XK", "VG", "BR", "PK"] {
            assert!(is_iban_country(code), "expected {} in registry", code);
        }
        for code in ["US", "CA", "AU", "NZ", "JP", "CN", "IN", "MX"] {
            assert!(!is_iban_country(code), "did not expect {} in registry", code);
        }
    }
}
