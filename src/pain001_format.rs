//! pain.001 (Customer Credit Transfer Initiation) assembler.
//!
//! pain.001 rides SEPA-style rails where IBAN is mandatory on both
//! sides, so this assembler has no Fedwire or USABA variant: both
//! accounts serialize as IBAN elements and both agents as BICFI. All
//! identifiers and timestamps are caller-supplied; this assembler
//! generates nothing itself and is a pure function of its record.

use std::io::Write;

use crate::error::Result;
use crate::types::Pain001Record;
use crate::xml::XmlBuilder;

const NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:pain.001.001.09";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str =
    "urn:iso:std:iso:20022:tech:xsd:pain.001.001.09 pain.001.001.09.xsd";

/// Represents a pain.001 message ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Pain001Message {
    /// The underlying flat record.
    pub record: Pain001Record,
}

impl Pain001Message {
    /// Serialize the message to an XML string.
    pub fn to_xml_string(&self) -> Result<String> {
        let r = &self.record;
        let amount = format!("{:.2}", r.instructed_amount);

        let mut b = XmlBuilder::new();
        b.declaration()?;
        b.open_with_attrs(
            "Document",
            &[
                ("xmlns", NAMESPACE),
                ("xmlns:xsi", XSI_NAMESPACE),
                ("xsi:schemaLocation", SCHEMA_LOCATION),
            ],
        )?;
        b.open("CstmrCdtTrfInitn")?;

        b.open("GrpHdr")?;
        b.leaf("MsgId", &r.msg_id)?;
        b.leaf("CreDtTm", &r.creation_date_time)?;
        b.leaf("NbOfTxs", "1")?;
        b.open("InitgPty")?;
        b.leaf("Nm", &r.initiating_party_name)?;
        b.close("InitgPty")?;
        b.close("GrpHdr")?;

        b.open("PmtInf")?;
        b.leaf("PmtInfId", &r.payment_info_id)?;
        b.leaf("PmtMtd", &r.payment_method)?;
        b.leaf("BtchBookg", if r.batch_booking { "true" } else { "false" })?;
        b.leaf("NbOfTxs", "1")?;
        // Single transaction, so the control sum equals its amount.
        b.leaf("CtrlSum", &amount)?;
        b.open("PmtTpInf")?;
        b.open("SvcLvl")?;
        b.leaf("Cd", "SEPA")?;
        b.close("SvcLvl")?;
        b.close("PmtTpInf")?;
        b.leaf("ReqdExctnDt", &r.requested_execution_date)?;

        b.open("Dbtr")?;
        b.leaf("Nm", &r.debtor_name)?;
        write_postal_address(
            &mut b,
            &r.debtor_street,
            &r.debtor_building_number,
            &r.debtor_post_code,
            &r.debtor_town,
            &r.debtor_country,
        )?;
        b.close("Dbtr")?;
        write_iban_account(&mut b, "DbtrAcct", &r.debtor_iban)?;
        write_bicfi_agent(&mut b, "DbtrAgt", &r.debtor_agent_bicfi)?;
        write_bicfi_agent(&mut b, "CdtrAgt", &r.creditor_agent_bicfi)?;
        b.open("Cdtr")?;
        b.leaf("Nm", &r.creditor_name)?;
        write_postal_address(
            &mut b,
            &r.creditor_street,
            &r.creditor_building_number,
            &r.creditor_post_code,
            &r.creditor_town,
            &r.creditor_country,
        )?;
        b.close("Cdtr")?;
        write_iban_account(&mut b, "CdtrAcct", &r.creditor_iban)?;

        b.open("Purp")?;
        b.leaf("Cd", "GDDS")?;
        b.close("Purp")?;
        b.open("RmtInf")?;
        b.leaf("Ustrd", &r.remittance_info)?;
        b.close("RmtInf")?;

        b.open("CdtTrfTxInf")?;
        b.open("PmtId")?;
        b.leaf("EndToEndId", &format!("E2EID{}", r.payment_info_id))?;
        b.close("PmtId")?;
        b.open("PmtTpInf")?;
        b.leaf("InstrPrty", "NORM")?;
        b.close("PmtTpInf")?;
        b.open("Amt")?;
        b.leaf_with_attrs("InstdAmt", &[("Ccy", &r.currency)], &amount)?;
        b.close("Amt")?;
        b.open("Dbtr")?;
        b.leaf("Nm", &r.debtor_name)?;
        b.close("Dbtr")?;
        write_iban_account(&mut b, "DbtrAcct", &r.debtor_iban)?;
        write_bicfi_agent(&mut b, "DbtrAgt", &r.debtor_agent_bicfi)?;
        write_bicfi_agent(&mut b, "CdtrAgt", &r.creditor_agent_bicfi)?;
        b.open("Cdtr")?;
        b.leaf("Nm", &r.creditor_name)?;
        b.close("Cdtr")?;
        write_iban_account(&mut b, "CdtrAcct", &r.creditor_iban)?;
        b.close("CdtTrfTxInf")?;

        b.close("PmtInf")?;
        b.close("CstmrCdtTrfInitn")?;
        b.close("Document")?;
        b.finish()
    }

    /// Write the message to any destination implementing `Write`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let xml = self.to_xml_string()?;
        writer.write_all(xml.as_bytes())?;
        Ok(())
    }
}

fn write_postal_address(
    b: &mut XmlBuilder,
    street: &str,
    building_number: &str,
    post_code: &str,
    town: &str,
    country: &str,
) -> Result<()> {
    b.open("PstlAdr")?;
    b.leaf("StrtNm", street)?;
    b.leaf("BldgNb", building_number)?;
    b.leaf("PstCd", post_code)?;
    b.leaf("TwnNm", town)?;
    b.leaf("Ctry", country)?;
    b.close("PstlAdr")
}

fn write_iban_account(b: &mut XmlBuilder, tag: &str, iban: &str) -> Result<()> {
    b.open(tag)?;
    b.open("Id")?;
    b.leaf("IBAN", iban)?;
    b.close("Id")?;
    b.close(tag)
}

fn write_bicfi_agent(b: &mut XmlBuilder, tag: &str, bicfi: &str) -> Result<()> {
    b.open(tag)?;
    b.open("FinInstnId")?;
    b.leaf("BICFI", bicfi)?;
    b.close("FinInstnId")?;
    b.close(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_record() -> Pain001Record {
        Pain001Record {
            msg_id: "MSG20250601120000".to_string(),
            creation_date_time: "2025-06-01T12:00:00+00:00".to_string(),
            initiating_party_name: "Originator Company".to_string(),
            payment_info_id: "PMTINF20250601120000".to_string(),
            payment_method: "TRF".to_string(),
            batch_booking: true,
            requested_execution_date: "2025-06-02".to_string(),
            currency: "EUR".to_string(),
            debtor_name: "Debtor Name".to_string(),
            debtor_street: "Debtor Street".to_string(),
            debtor_building_number: "10".to_string(),
            debtor_post_code: "10001".to_string(),
            debtor_town: "New York".to_string(),
            debtor_country: "US".to_string(),
            debtor_iban: "US12345678901234567890".to_string(),
            debtor_agent_bicfi: "DBTRUS33XXX".to_string(),
            creditor_name: "Creditor Name".to_string(),
            creditor_street: "Creditor Street".to_string(),
            creditor_building_number: "20".to_string(),
            creditor_post_code: "SW1A0AA".to_string(),
            creditor_town: "London".to_string(),
            creditor_country: "GB".to_string(),
            creditor_iban: "GB98765432109876543210".to_string(),
            creditor_agent_bicfi: "CDTRGB2LXXX".to_string(),
            instructed_amount: "100.00".parse().unwrap(),
            remittance_info: "Payment for services rendered - Invoice ABC123".to_string(),
        }
    }

    #[test]
    fn test_fixed_codes_and_structure() {
        let xml = Pain001Message {
            record: sample_record(),
        }
        .to_xml_string()
        .unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("urn:iso:std:iso:20022:tech:xsd:pain.001.001.09"));
        assert!(xml.contains("<Cd>SEPA</Cd>"));
        assert!(xml.contains("<Cd>GDDS</Cd>"));
        assert!(xml.contains("<InstrPrty>NORM</InstrPrty>"));
        assert!(xml.contains("<CtrlSum>100.00</CtrlSum>"));
        assert!(xml.contains("<InstdAmt Ccy=\"EUR\">100.00</InstdAmt>"));
        assert!(xml.contains("<EndToEndId>E2EIDPMTINF20250601120000</EndToEndId>"));
        assert!(xml.contains("<BtchBookg>true</BtchBookg>"));
    }

    #[test]
    fn test_both_accounts_use_iban() {
        let xml = Pain001Message {
            record: sample_record(),
        }
        .to_xml_string()
        .unwrap();

        assert!(xml.contains("<IBAN>US12345678901234567890</IBAN>"));
        assert!(xml.contains("<IBAN>GB98765432109876543210</IBAN>"));
        assert!(!xml.contains("<Othr>"));
    }

    #[test]
    fn test_free_text_is_escaped() {
        let mut record = sample_record();
        record.remittance_info = "Goods & services <urgent>".to_string();
        record.creditor_name = "Smith & Sons".to_string();
        let xml = Pain001Message { record }.to_xml_string().unwrap();
        assert!(xml.contains("Goods &amp; services &lt;urgent&gt;"));
        assert!(xml.contains("Smith &amp; Sons"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let message = Pain001Message {
            record: sample_record(),
        };
        assert_eq!(
            message.to_xml_string().unwrap(),
            message.to_xml_string().unwrap()
        );
    }

    #[test]
    fn test_write_to_matches_string() {
        let message = Pain001Message {
            record: sample_record(),
        };
        let mut buffer = Vec::new();
        message.write_to(&mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            message.to_xml_string().unwrap()
        );
    }
}
