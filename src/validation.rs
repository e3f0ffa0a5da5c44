//! Cross-field validation for Fedwire USABA identification.
//!
//! A USABA clearing-system member ID is only meaningful together with the
//! institution's name and full postal address, so those companions become
//! mandatory the moment a member ID is present. Violations are collected
//! exhaustively so the caller can surface every problem at once; message
//! assembly is skipped entirely while any exist.

use crate::types::{AgentFields, ChannelContext, FedwireSubtype};

/// Validate USABA companion fields on a pacs.008 record.
///
/// Applies only to the Fedwire channel; SWIFT records always pass. The
/// record is never mutated.
pub fn validate_usaba_fields(
    record: &crate::types::Pacs008Record,
    ctx: ChannelContext,
) -> Vec<String> {
    let subtype = match ctx {
        ChannelContext::Swift => return Vec::new(),
        ChannelContext::Fedwire(subtype) => subtype,
    };

    let mut violations = Vec::new();

    check_usaba_companions(&record.debtor_agent(), "Debtor Agent", &mut violations);

    // The creditor agent only carries a USABA ID on the domestic sub-type;
    // internationally it is identified by BICFI.
    if subtype == FedwireSubtype::Domestic {
        check_usaba_companions(&record.creditor_agent(), "Creditor Agent", &mut violations);
    }

    // Country codes are length-checked whenever present, independent of
    // the member-ID conditions above. The overlap with the USABA checks
    // is intentional.
    check_country_length(record.debtor_agent().country, "Debtor Agent", &mut violations);
    check_country_length(
        record.creditor_agent().country,
        "Creditor Agent",
        &mut violations,
    );
    check_country_length(&record.debtor_country, "Debtor", &mut violations);
    check_country_length(&record.creditor_country, "Creditor", &mut violations);

    if !violations.is_empty() {
        tracing::debug!(count = violations.len(), "USABA validation failed");
    }

    violations
}

/// Validate the settlement method against the channel's vocabulary:
/// Fedwire settles through clearing (`CLRG`), SWIFT through one of
/// `INDA`, `INGA` or `COVE`.
pub fn validate_settlement_method(method: &str, ctx: ChannelContext) -> Option<String> {
    match ctx {
        ChannelContext::Fedwire(_) if method != "CLRG" => Some(format!(
            "Settlement method must be CLRG for Fedwire, got '{}'",
            method
        )),
        ChannelContext::Swift if !matches!(method, "INDA" | "INGA" | "COVE") => Some(format!(
            "Settlement method must be one of INDA, INGA, COVE for SWIFT, got '{}'",
            method
        )),
        _ => None,
    }
}

fn check_usaba_companions(agent: &AgentFields<'_>, label: &str, violations: &mut Vec<String>) {
    if agent.member_id.is_empty() {
        return;
    }

    if agent.name.is_empty() {
        violations.push(format!(
            "{}: Name is mandatory when a USABA member ID is supplied",
            label
        ));
    }
    if agent.street.is_empty() {
        violations.push(format!(
            "{}: Street name is mandatory when a USABA member ID is supplied",
            label
        ));
    }
    if agent.town.is_empty() {
        violations.push(format!(
            "{}: Town name is mandatory when a USABA member ID is supplied",
            label
        ));
    }
    if agent.country.is_empty() {
        violations.push(format!(
            "{}: Country is mandatory when a USABA member ID is supplied",
            label
        ));
    } else if agent.country.len() != 2 {
        violations.push(format!(
            "{}: Country code '{}' must be exactly 2 characters",
            label, agent.country
        ));
    }
}

fn check_country_length(country: &str, label: &str, violations: &mut Vec<String>) {
    if !country.is_empty() && country.len() != 2 {
        violations.push(format!(
            "Country code '{}' in {} is not a valid 2-character code",
            country, label
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pacs008Record;

    fn domestic_record() -> Pacs008Record {
        Pacs008Record {
            debtor_agent_member_id: "011104238".to_string(),
            debtor_agent_name: "Debtor Bank".to_string(),
            debtor_agent_street: "Main St".to_string(),
            debtor_agent_town: "New York".to_string(),
            debtor_agent_country: "US".to_string(),
            creditor_agent_member_id: "021040078".to_string(),
            creditor_agent_name: "Creditor Bank".to_string(),
            creditor_agent_street: "Wall St".to_string(),
            creditor_agent_town: "New York".to_string(),
            creditor_agent_country: "US".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_swift_always_passes() {
        let mut record = domestic_record();
        record.creditor_agent_name.clear();
        assert!(validate_usaba_fields(&record, ChannelContext::Swift).is_empty());
    }

    #[test]
    fn test_complete_domestic_record_passes() {
        let record = domestic_record();
        let ctx = ChannelContext::Fedwire(FedwireSubtype::Domestic);
        assert_eq!(validate_usaba_fields(&record, ctx), Vec::<String>::new());
    }

    #[test]
    fn test_missing_creditor_agent_name_is_reported() {
        let mut record = domestic_record();
        record.creditor_agent_name.clear();
        let ctx = ChannelContext::Fedwire(FedwireSubtype::Domestic);
        let violations = validate_usaba_fields(&record, ctx);
        assert!(violations
            .iter()
            .any(|v| v.starts_with("Creditor Agent") && v.contains("Name is mandatory")));
    }

    #[test]
    fn test_three_character_country_is_reported() {
        let mut record = domestic_record();
        record.creditor_agent_country = "USA".to_string();
        let ctx = ChannelContext::Fedwire(FedwireSubtype::Domestic);
        let violations = validate_usaba_fields(&record, ctx);
        assert!(violations.iter().any(|v| v.contains("USA")));
        // Both the USABA companion check and the independent length check fire.
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_violations_are_collected_not_fail_fast() {
        let mut record = domestic_record();
        record.debtor_agent_name.clear();
        record.debtor_agent_street.clear();
        record.creditor_agent_town.clear();
        let ctx = ChannelContext::Fedwire(FedwireSubtype::Domestic);
        assert_eq!(validate_usaba_fields(&record, ctx).len(), 3);
    }

    #[test]
    fn test_international_skips_creditor_agent_usaba() {
        let mut record = domestic_record();
        record.creditor_agent_name.clear();
        let ctx = ChannelContext::Fedwire(FedwireSubtype::International);
        assert!(validate_usaba_fields(&record, ctx).is_empty());
    }

    #[test]
    fn test_party_country_length_is_always_checked() {
        let mut record = domestic_record();
        record.creditor_country = "GBR".to_string();
        let ctx = ChannelContext::Fedwire(FedwireSubtype::Domestic);
        let violations = validate_usaba_fields(&record, ctx);
        assert!(violations.iter().any(|v| v.contains("GBR")));
    }

    #[test]
    fn test_settlement_method_vocabulary() {
        let fedwire = ChannelContext::Fedwire(FedwireSubtype::Domestic);
        assert!(validate_settlement_method("CLRG", fedwire).is_none());
        assert!(validate_settlement_method("INDA", fedwire).is_some());
        assert!(validate_settlement_method("INDA", ChannelContext::Swift).is_none());
        assert!(validate_settlement_method("CLRG", ChannelContext::Swift).is_some());
    }
}
