//! Identifier-scheme selection for accounts and agents.
//!
//! Each payment rail imposes its own rules for how an account or a
//! financial institution is identified inside the message. The selectors
//! here turn a channel context plus raw field values into a tagged
//! representation; the assemblers serialize whatever comes back without
//! re-checking the rules.

use crate::registry::is_iban_country;
use crate::types::{AgentFields, AgentRole, ChannelContext, FedwireSubtype};

/// How a cash account is identified in the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountRepresentation {
    /// `<Id><IBAN>...</IBAN></Id>`
    Iban(String),
    /// `<Id><Othr><Id>...</Id></Othr></Id>`
    Other(String),
}

/// Postal address block for a USABA clearing identification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalAddress {
    pub street: String,
    pub building_number: String,
    pub post_code: String,
    pub town: String,
    pub country: String,
}

/// How a financial institution is identified in the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentRepresentation {
    /// `<FinInstnId><BICFI>...</BICFI></FinInstnId>`
    Bicfi(String),
    /// USABA clearing-system member ID with mandatory name and address.
    UsabaClearing {
        member_id: String,
        name: String,
        address: PostalAddress,
    },
    /// USABA clearing-system member ID alone (group-header agents).
    UsabaMember(String),
    /// No matching identifier present; the element body stays empty.
    /// Incomplete USABA data is rejected upstream by the validator.
    Absent,
}

/// Decide how an account is represented for the given rail.
///
/// First match wins:
/// 1. Fedwire domestic never uses IBAN, regardless of country.
/// 2. Fedwire international uses IBAN iff the country is in the registry.
/// 3. SWIFT uses IBAN iff the country is in the registry.
pub fn select_account_representation(
    account_value: &str,
    country_code: &str,
    ctx: ChannelContext,
) -> AccountRepresentation {
    let use_iban = match ctx {
        ChannelContext::Fedwire(FedwireSubtype::Domestic) => false,
        ChannelContext::Fedwire(FedwireSubtype::International) => is_iban_country(country_code),
        ChannelContext::Swift => is_iban_country(country_code),
    };

    if use_iban {
        AccountRepresentation::Iban(account_value.to_string())
    } else {
        AccountRepresentation::Other(account_value.to_string())
    }
}

/// Decide how a transaction-level agent is represented for the given rail.
///
/// SWIFT agents carry a BICFI; Fedwire domestic agents carry a USABA
/// member ID with name and address. Fedwire international splits by role:
/// the debtor agent is the US side (USABA), the creditor agent the
/// foreign side (BICFI).
pub fn select_agent_representation(
    role: AgentRole,
    ctx: ChannelContext,
    fields: &AgentFields<'_>,
) -> AgentRepresentation {
    match ctx {
        ChannelContext::Swift if !fields.bicfi.is_empty() => {
            AgentRepresentation::Bicfi(fields.bicfi.to_string())
        }
        ChannelContext::Fedwire(FedwireSubtype::Domestic) if !fields.member_id.is_empty() => {
            usaba_clearing(fields)
        }
        ChannelContext::Fedwire(FedwireSubtype::International) => match role {
            AgentRole::DebtorAgent if !fields.member_id.is_empty() => usaba_clearing(fields),
            AgentRole::CreditorAgent if !fields.bicfi.is_empty() => {
                AgentRepresentation::Bicfi(fields.bicfi.to_string())
            }
            _ => AgentRepresentation::Absent,
        },
        _ => AgentRepresentation::Absent,
    }
}

/// Decide how a group-header agent (instructing/instructed) is represented.
///
/// Channel-only rule: SWIFT uses the BICFI, Fedwire the USABA member ID
/// without an address block.
pub fn select_group_agent(
    ctx: ChannelContext,
    bicfi: &str,
    member_id: &str,
) -> AgentRepresentation {
    match ctx {
        ChannelContext::Swift => AgentRepresentation::Bicfi(bicfi.to_string()),
        ChannelContext::Fedwire(_) => AgentRepresentation::UsabaMember(member_id.to_string()),
    }
}

fn usaba_clearing(fields: &AgentFields<'_>) -> AgentRepresentation {
    AgentRepresentation::UsabaClearing {
        member_id: fields.member_id.to_string(),
        name: fields.name.to_string(),
        address: PostalAddress {
            street: fields.street.to_string(),
            building_number: fields.building_number.to_string(),
            post_code: fields.post_code.to_string(),
            town: fields.town.to_string(),
            country: fields.country.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCT: &str = "DE89370400440532013000";

    fn fields<'a>() -> AgentFields<'a> {
        AgentFields {
            bicfi: "DBTRUS33XXX",
            member_id: "011104238",
            name: "Debtor Bank",
            street: "Main St",
            building_number: "1",
            post_code: "10001",
            town: "New York",
            country: "US",
        }
    }

    #[test]
    fn test_fedwire_domestic_never_uses_iban() {
        // Sub-type domestic overrides country membership, even for DE.
        for country in ["DE", "GB", "US", "FR", "XX"] {
            let repr = select_account_representation(
                ACCT,
                country,
                ChannelContext::Fedwire(FedwireSubtype::Domestic),
            );
            assert_eq!(repr, AccountRepresentation::Other(ACCT.to_string()));
        }
    }

    #[test]
    fn test_fedwire_international_splits_on_registry() {
        let ctx = ChannelContext::Fedwire(FedwireSubtype::International);
        assert_eq!(
            select_account_representation(ACCT, "DE", ctx),
            AccountRepresentation::Iban(ACCT.to_string())
        );
        assert_eq!(
            select_account_representation(ACCT, "US", ctx),
            AccountRepresentation::Other(ACCT.to_string())
        );
    }

    #[test]
    fn test_swift_splits_on_registry() {
        assert_eq!(
            select_account_representation(ACCT, "DE", ChannelContext::Swift),
            AccountRepresentation::Iban(ACCT.to_string())
        );
        assert_eq!(
            select_account_representation(ACCT, "US", ChannelContext::Swift),
            AccountRepresentation::Other(ACCT.to_string())
        );
    }

    #[test]
    fn test_non_registry_country_never_gets_iban() {
        let contexts = [
            ChannelContext::Swift,
            ChannelContext::Fedwire(FedwireSubtype::Domestic),
            ChannelContext::Fedwire(FedwireSubtype::International),
        ];
        for ctx in contexts {
            assert!(matches!(
                select_account_representation(ACCT, "US", ctx),
                AccountRepresentation::Other(_)
            ));
        }
    }

    #[test]
    fn test_swift_agent_uses_bicfi() {
        let repr =
            select_agent_representation(AgentRole::DebtorAgent, ChannelContext::Swift, &fields());
        assert_eq!(repr, AgentRepresentation::Bicfi("DBTRUS33XXX".to_string()));
    }

    #[test]
    fn test_fedwire_domestic_agent_uses_usaba_with_address() {
        let repr = select_agent_representation(
            AgentRole::CreditorAgent,
            ChannelContext::Fedwire(FedwireSubtype::Domestic),
            &fields(),
        );
        match repr {
            AgentRepresentation::UsabaClearing {
                member_id,
                name,
                address,
            } => {
                assert_eq!(member_id, "011104238");
                assert_eq!(name, "Debtor Bank");
                assert_eq!(address.town, "New York");
                assert_eq!(address.country, "US");
            }
            other => panic!("expected UsabaClearing, got {:?}", other),
        }
    }

    #[test]
    fn test_fedwire_international_splits_on_role() {
        let ctx = ChannelContext::Fedwire(FedwireSubtype::International);
        assert!(matches!(
            select_agent_representation(AgentRole::DebtorAgent, ctx, &fields()),
            AgentRepresentation::UsabaClearing { .. }
        ));
        assert!(matches!(
            select_agent_representation(AgentRole::CreditorAgent, ctx, &fields()),
            AgentRepresentation::Bicfi(_)
        ));
    }

    #[test]
    fn test_missing_identifiers_yield_absent() {
        let empty = AgentFields {
            bicfi: "",
            member_id: "",
            name: "",
            street: "",
            building_number: "",
            post_code: "",
            town: "",
            country: "",
        };
        assert_eq!(
            select_agent_representation(AgentRole::DebtorAgent, ChannelContext::Swift, &empty),
            AgentRepresentation::Absent
        );
        assert_eq!(
            select_agent_representation(
                AgentRole::CreditorAgent,
                ChannelContext::Fedwire(FedwireSubtype::Domestic),
                &empty
            ),
            AgentRepresentation::Absent
        );
    }

    #[test]
    fn test_group_agent_is_channel_only() {
        assert_eq!(
            select_group_agent(ChannelContext::Swift, "INSTGB2LXXX", "011104238"),
            AgentRepresentation::Bicfi("INSTGB2LXXX".to_string())
        );
        assert_eq!(
            select_group_agent(
                ChannelContext::Fedwire(FedwireSubtype::Domestic),
                "INSTGB2LXXX",
                "011104238"
            ),
            AgentRepresentation::UsabaMember("011104238".to_string())
        );
    }
}
