//! Common types used across message assembly.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Payment rail over which a pacs.008 message travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// SWIFT CBPR+ cross-border messaging.
    Swift,
    /// Fedwire real-time gross settlement.
    Fedwire,
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "swift" => Ok(Channel::Swift),
            "fedwire" => Ok(Channel::Fedwire),
            _ => Err(Error::InvalidChannel(s.to_string())),
        }
    }
}

/// Fedwire payment sub-type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FedwireSubtype {
    /// US-to-US payment.
    Domestic,
    /// US-to-foreign payment.
    International,
}

impl FromStr for FedwireSubtype {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "domestic" => Ok(FedwireSubtype::Domestic),
            "international" => Ok(FedwireSubtype::International),
            _ => Err(Error::InvalidChannel(format!("fedwire sub-type: {}", s))),
        }
    }
}

/// Immutable routing context for one message-build call.
///
/// The channel and Fedwire sub-type fully determine identifier-scheme
/// selection; a sub-type exists exactly when the channel is Fedwire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelContext {
    Swift,
    Fedwire(FedwireSubtype),
}

impl ChannelContext {
    /// Build a context from string arguments, as supplied by a CLI or form.
    ///
    /// A Fedwire channel requires a sub-type; a SWIFT channel rejects one.
    pub fn from_args(channel: &str, fedwire_subtype: Option<&str>) -> Result<Self> {
        match channel.parse::<Channel>()? {
            Channel::Swift => match fedwire_subtype {
                None => Ok(ChannelContext::Swift),
                Some(s) => Err(Error::InvalidChannel(format!(
                    "fedwire sub-type '{}' is not valid for the swift channel",
                    s
                ))),
            },
            Channel::Fedwire => match fedwire_subtype {
                Some(s) => Ok(ChannelContext::Fedwire(s.parse()?)),
                None => Err(Error::InvalidChannel(
                    "the fedwire channel requires a sub-type (domestic or international)"
                        .to_string(),
                )),
            },
        }
    }

    /// The channel component of the context.
    pub fn channel(&self) -> Channel {
        match self {
            ChannelContext::Swift => Channel::Swift,
            ChannelContext::Fedwire(_) => Channel::Fedwire,
        }
    }

    /// The Fedwire sub-type, if the channel is Fedwire.
    pub fn fedwire_subtype(&self) -> Option<FedwireSubtype> {
        match self {
            ChannelContext::Swift => None,
            ChannelContext::Fedwire(subtype) => Some(*subtype),
        }
    }
}

/// Transaction-level agent role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    DebtorAgent,
    CreditorAgent,
}

/// Identifier and address fields for one financial-institution agent,
/// borrowed from the owning record for the duration of a selection call.
#[derive(Debug, Clone, Copy)]
pub struct AgentFields<'a> {
    pub bicfi: &'a str,
    pub member_id: &'a str,
    pub name: &'a str,
    pub street: &'a str,
    pub building_number: &'a str,
    pub post_code: &'a str,
    pub town: &'a str,
    pub country: &'a str,
}

/// Where an exchange rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateSource {
    /// Live quote from the rate provider.
    Provider,
    /// Static fallback table entry.
    Fallback,
    /// Rate entered by the caller.
    Manual,
    /// Same-currency pair; rate is 1.0 by definition.
    Identity,
}

/// An exchange-rate quote used to derive the settlement amount.
///
/// Quotes are per-request: produced or entered, applied immediately, and
/// never persisted by this crate. Fallback quotes keep their fetch-time
/// timestamp so callers can apply their own staleness policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeQuote {
    pub rate: Decimal,
    pub timestamp: DateTime<Utc>,
    pub source: RateSource,
}

/// Flat input record for a pain.001 customer credit transfer initiation.
///
/// Field names mirror the canonical key list (`msgId`, `dbtrNm`, ...).
/// All values default to empty; blank fields are a caller data-quality
/// concern, not an error at this layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pain001Record {
    pub msg_id: String,
    pub creation_date_time: String,
    pub initiating_party_name: String,
    pub payment_info_id: String,
    pub payment_method: String,
    pub batch_booking: bool,
    pub requested_execution_date: String,
    pub currency: String,
    pub debtor_name: String,
    pub debtor_street: String,
    pub debtor_building_number: String,
    pub debtor_post_code: String,
    pub debtor_town: String,
    pub debtor_country: String,
    pub debtor_iban: String,
    pub debtor_agent_bicfi: String,
    pub creditor_name: String,
    pub creditor_street: String,
    pub creditor_building_number: String,
    pub creditor_post_code: String,
    pub creditor_town: String,
    pub creditor_country: String,
    pub creditor_iban: String,
    pub creditor_agent_bicfi: String,
    pub instructed_amount: Decimal,
    pub remittance_info: String,
}

impl Pain001Record {
    /// Build a record from flat `(key, value)` pairs.
    ///
    /// Unknown keys are ignored and missing keys keep their defaults;
    /// only an unparseable amount is an error.
    pub fn from_fields<I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut record = Self::default();
        for (key, value) in fields {
            match key.as_str() {
                "msgId" => record.msg_id = value,
                "creDtTm" => record.creation_date_time = value,
                "initgPtyNm" => record.initiating_party_name = value,
                "pmtInfId" => record.payment_info_id = value,
                "pmtMtd" => record.payment_method = value,
                "btchBookg" => record.batch_booking = parse_bool(&value),
                "reqdExctnDt" => record.requested_execution_date = value,
                "currency" => record.currency = value,
                "dbtrNm" => record.debtor_name = value,
                "dbtrStrtNm" => record.debtor_street = value,
                "dbtrBldgNb" => record.debtor_building_number = value,
                "dbtrPstCd" => record.debtor_post_code = value,
                "dbtrTwnNm" => record.debtor_town = value,
                "dbtrCtry" => record.debtor_country = value,
                "dbtrAcctIBAN" => record.debtor_iban = value,
                "dbtrAgtBICFI" => record.debtor_agent_bicfi = value,
                "cdtrNm" => record.creditor_name = value,
                "cdtrStrtNm" => record.creditor_street = value,
                "cdtrBldgNb" => record.creditor_building_number = value,
                "cdtrPstCd" => record.creditor_post_code = value,
                "cdtrTwnNm" => record.creditor_town = value,
                "cdtrCtry" => record.creditor_country = value,
                "cdtrAcctIBAN" => record.creditor_iban = value,
                "cdtrAgtBICFI" => record.creditor_agent_bicfi = value,
                "instdAmt" => record.instructed_amount = parse_amount(&value)?,
                "ustrdRmtInf" => record.remittance_info = value,
                _ => {}
            }
        }
        Ok(record)
    }
}

/// Flat input record for a pacs.008 FI-to-FI customer credit transfer.
///
/// Carries both SWIFT (BICFI) and Fedwire (USABA member ID plus agent
/// name/address) identifier fields; the channel decides which are read,
/// unused ones stay empty. The creation instant is supplied by the
/// assembler's clock, not by the record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pacs008Record {
    pub msg_id: String,
    pub settlement_method: String,
    pub interbank_settlement_date: String,
    pub instructing_agent_bicfi: String,
    pub instructed_agent_bicfi: String,
    pub instructing_agent_member_id: String,
    pub instructed_agent_member_id: String,
    pub debtor_name: String,
    pub debtor_street: String,
    pub debtor_building_number: String,
    pub debtor_post_code: String,
    pub debtor_town: String,
    pub debtor_country: String,
    pub debtor_account: String,
    pub debtor_agent_bicfi: String,
    pub debtor_agent_member_id: String,
    pub debtor_agent_name: String,
    pub debtor_agent_street: String,
    pub debtor_agent_building_number: String,
    pub debtor_agent_post_code: String,
    pub debtor_agent_town: String,
    pub debtor_agent_country: String,
    pub creditor_name: String,
    pub creditor_street: String,
    pub creditor_building_number: String,
    pub creditor_post_code: String,
    pub creditor_town: String,
    pub creditor_country: String,
    pub creditor_account: String,
    pub creditor_agent_bicfi: String,
    pub creditor_agent_member_id: String,
    pub creditor_agent_name: String,
    pub creditor_agent_street: String,
    pub creditor_agent_building_number: String,
    pub creditor_agent_post_code: String,
    pub creditor_agent_town: String,
    pub creditor_agent_country: String,
    pub instructed_amount: Decimal,
    pub instructed_currency: String,
    /// Settlement-leg currency; empty means same as the instructed currency.
    pub settlement_currency: String,
    /// Manually supplied exchange rate, if any.
    pub exchange_rate: Option<Decimal>,
    pub remittance_info: String,
}

impl Pacs008Record {
    /// Build a record from flat `(key, value)` pairs.
    ///
    /// Unknown keys are ignored and missing keys keep their defaults;
    /// only an unparseable amount or rate is an error.
    pub fn from_fields<I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut record = Self::default();
        for (key, value) in fields {
            match key.as_str() {
                "msgId" => record.msg_id = value,
                "sttlmMtd" => record.settlement_method = value,
                "intrBkSttlmDt" => record.interbank_settlement_date = value,
                "instgAgtBICFI" => record.instructing_agent_bicfi = value,
                "instdAgtBICFI" => record.instructed_agent_bicfi = value,
                "instgAgtMmbId" => record.instructing_agent_member_id = value,
                "instdAgtMmbId" => record.instructed_agent_member_id = value,
                "dbtrNm" => record.debtor_name = value,
                "dbtrStrtNm" => record.debtor_street = value,
                "dbtrBldgNb" => record.debtor_building_number = value,
                "dbtrPstCd" => record.debtor_post_code = value,
                "dbtrTwnNm" => record.debtor_town = value,
                "dbtrCtry" => record.debtor_country = value,
                "dbtrAcctIBAN" => record.debtor_account = value,
                "dbtrAgtBICFI_tx" => record.debtor_agent_bicfi = value,
                "dbtrAgtMmbId" => record.debtor_agent_member_id = value,
                "dbtrAgtNm" => record.debtor_agent_name = value,
                "dbtrAgtStrtNm" => record.debtor_agent_street = value,
                "dbtrAgtBldgNb" => record.debtor_agent_building_number = value,
                "dbtrAgtPstCd" => record.debtor_agent_post_code = value,
                "dbtrAgtTwnNm" => record.debtor_agent_town = value,
                "dbtrAgtCtry" => record.debtor_agent_country = value,
                "cdtrNm" => record.creditor_name = value,
                "cdtrStrtNm" => record.creditor_street = value,
                "cdtrBldgNb" => record.creditor_building_number = value,
                "cdtrPstCd" => record.creditor_post_code = value,
                "cdtrTwnNm" => record.creditor_town = value,
                "cdtrCtry" => record.creditor_country = value,
                "cdtrAcctIBAN" => record.creditor_account = value,
                "cdtrAgtBICFI_tx" => record.creditor_agent_bicfi = value,
                "cdtrAgtMmbId" => record.creditor_agent_member_id = value,
                "cdtrAgtNm" => record.creditor_agent_name = value,
                "cdtrAgtStrtNm" => record.creditor_agent_street = value,
                "cdtrAgtBldgNb" => record.creditor_agent_building_number = value,
                "cdtrAgtPstCd" => record.creditor_agent_post_code = value,
                "cdtrAgtTwnNm" => record.creditor_agent_town = value,
                "cdtrAgtCtry" => record.creditor_agent_country = value,
                "instdAmt" => record.instructed_amount = parse_amount(&value)?,
                "currency" => record.instructed_currency = value,
                "sttlmCcy" => record.settlement_currency = value,
                "xchgRate" => {
                    record.exchange_rate = if value.trim().is_empty() {
                        None
                    } else {
                        Some(parse_rate(&value)?)
                    }
                }
                "ustrdRmtInf" => record.remittance_info = value,
                _ => {}
            }
        }
        Ok(record)
    }

    /// Debtor-agent identifier and address bundle.
    pub fn debtor_agent(&self) -> AgentFields<'_> {
        AgentFields {
            bicfi: &self.debtor_agent_bicfi,
            member_id: &self.debtor_agent_member_id,
            name: &self.debtor_agent_name,
            street: &self.debtor_agent_street,
            building_number: &self.debtor_agent_building_number,
            post_code: &self.debtor_agent_post_code,
            town: &self.debtor_agent_town,
            country: &self.debtor_agent_country,
        }
    }

    /// Creditor-agent identifier and address bundle.
    pub fn creditor_agent(&self) -> AgentFields<'_> {
        AgentFields {
            bicfi: &self.creditor_agent_bicfi,
            member_id: &self.creditor_agent_member_id,
            name: &self.creditor_agent_name,
            street: &self.creditor_agent_street,
            building_number: &self.creditor_agent_building_number,
            post_code: &self.creditor_agent_post_code,
            town: &self.creditor_agent_town,
            country: &self.creditor_agent_country,
        }
    }

    /// The currency the interbank settlement leg is denominated in.
    pub fn effective_settlement_currency(&self) -> &str {
        if self.settlement_currency.is_empty() {
            &self.instructed_currency
        } else {
            &self.settlement_currency
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

fn parse_amount(value: &str) -> Result<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    trimmed
        .parse::<Decimal>()
        .map_err(|_| Error::InvalidAmount(value.to_string()))
}

fn parse_rate(value: &str) -> Result<Decimal> {
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|_| Error::InvalidRate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_context_from_args() {
        assert_eq!(
            ChannelContext::from_args("swift", None).unwrap(),
            ChannelContext::Swift
        );
        assert_eq!(
            ChannelContext::from_args("Fedwire", Some("domestic")).unwrap(),
            ChannelContext::Fedwire(FedwireSubtype::Domestic)
        );
        assert!(ChannelContext::from_args("fedwire", None).is_err());
        assert!(ChannelContext::from_args("swift", Some("domestic")).is_err());
        assert!(ChannelContext::from_args("telex", None).is_err());
    }

    #[test]
    fn test_pacs008_from_fields() {
        let fields = vec![
            ("msgId".to_string(), "20250101ABCD123456".to_string()),
            ("instdAmt".to_string(), "100.00".to_string()),
            ("currency".to_string(), "USD".to_string()),
            ("sttlmCcy".to_string(), "EUR".to_string()),
            ("dbtrAgtMmbId".to_string(), "011104238".to_string()),
            ("someUnknownKey".to_string(), "ignored".to_string()),
        ];
        let record = Pacs008Record::from_fields(fields).unwrap();
        assert_eq!(record.msg_id, "20250101ABCD123456");
        assert_eq!(record.instructed_amount, "100.00".parse().unwrap());
        assert_eq!(record.effective_settlement_currency(), "EUR");
        assert_eq!(record.debtor_agent().member_id, "011104238");
        // Missing keys stay at their defaults.
        assert!(record.creditor_agent_bicfi.is_empty());
    }

    #[test]
    fn test_settlement_currency_defaults_to_instructed() {
        let record = Pacs008Record {
            instructed_currency: "USD".to_string(),
            ..Default::default()
        };
        assert_eq!(record.effective_settlement_currency(), "USD");
    }

    #[test]
    fn test_invalid_amount_is_rejected() {
        let fields = vec![("instdAmt".to_string(), "one hundred".to_string())];
        assert!(Pain001Record::from_fields(fields).is_err());
    }
}
