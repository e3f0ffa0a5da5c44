//! pacs.008 (FI to FI Customer Credit Transfer) assembler.
//!
//! Orchestrates the full build for one message: cross-field validation,
//! settlement-amount derivation, identifier-scheme selection, and XML
//! serialization. On the SWIFT channel the document is preceded by a
//! business application header sharing the same message identifier.
//!
//! The creation instant and the UETR are the only values the assembler
//! produces itself; both come through injectable sources so identical
//! inputs yield byte-identical output.

use std::io::Write;

use rust_decimal::Decimal;

use crate::clock::{Clock, RandomUetr, SystemClock, UetrSource};
use crate::error::{Error, Result};
use crate::fx;
use crate::routing::{
    select_account_representation, select_agent_representation, select_group_agent,
    AccountRepresentation, AgentRepresentation,
};
use crate::types::{AgentRole, ChannelContext, ExchangeQuote, Pacs008Record, RateSource};
use crate::validation::{validate_settlement_method, validate_usaba_fields};
use crate::xml::XmlBuilder;

const NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:pacs.008.001.08";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str =
    "urn:iso:std:iso:20022:tech:xsd:pacs.008.001.08 pacs.008.001.08.xsd";
const HEADER_NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:head.001.001.02";
const MESSAGE_DEFINITION: &str = "pacs.008.001.08";
const BUSINESS_SERVICE: &str = "swift.cbprplus.02";

/// The body timestamp uses a literal Z suffix, the header +00:00; both
/// render the same UTC instant, as their schemas expect.
const BODY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const HEADER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+00:00";

/// Represents a pacs.008 message ready for generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Pacs008Message {
    /// The underlying flat record.
    pub record: Pacs008Record,
    /// Routing context fixed for the lifetime of this build.
    pub context: ChannelContext,
}

impl Pacs008Message {
    /// Generate the message using wall-clock time and a random UETR.
    pub fn generate(&self) -> Result<String> {
        self.generate_with(&SystemClock, &RandomUetr)
    }

    /// Generate the message with injected time and UETR sources.
    ///
    /// Runs the cross-field validator first; while any violation exists
    /// no XML is produced and the full list is returned in
    /// [`Error::Validation`].
    pub fn generate_with(&self, clock: &dyn Clock, uetr: &dyn UetrSource) -> Result<String> {
        let mut violations = validate_usaba_fields(&self.record, self.context);
        if let Some(v) = validate_settlement_method(&self.record.settlement_method, self.context) {
            violations.push(v);
        }
        if !violations.is_empty() {
            return Err(Error::Validation(violations));
        }

        let now = clock.now();
        let interbank_amount = self.interbank_settlement_amount(now);

        let document = self.build_document(&now.format(BODY_TIME_FORMAT).to_string(), interbank_amount, uetr)?;

        match self.context {
            ChannelContext::Swift => {
                let header = self.build_app_header(&now.format(HEADER_TIME_FORMAT).to_string())?;
                Ok(format!("{}\n{}", header, document))
            }
            ChannelContext::Fedwire(_) => Ok(document),
        }
    }

    /// Write the generated message to any destination implementing `Write`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let xml = self.generate()?;
        writer.write_all(xml.as_bytes())?;
        Ok(())
    }

    fn interbank_settlement_amount(&self, now: chrono::DateTime<chrono::Utc>) -> Decimal {
        let settlement_ccy = self.record.effective_settlement_currency();
        if !fx::needs_conversion(self.context, settlement_ccy, &self.record.instructed_currency) {
            return self.record.instructed_amount;
        }
        let quote = self.record.exchange_rate.map(|rate| ExchangeQuote {
            rate,
            timestamp: now,
            source: RateSource::Manual,
        });
        fx::settlement_amount(
            self.record.instructed_amount,
            settlement_ccy,
            &self.record.instructed_currency,
            quote.as_ref(),
        )
    }

    fn build_app_header(&self, creation_time: &str) -> Result<String> {
        let r = &self.record;
        let mut b = XmlBuilder::new();
        b.declaration()?;
        b.open_with_attrs("AppHdr", &[("xmlns", HEADER_NAMESPACE)])?;
        for (tag, bicfi) in [
            ("Fr", &r.instructing_agent_bicfi),
            ("To", &r.instructed_agent_bicfi),
        ] {
            b.open(tag)?;
            b.open("FIId")?;
            b.open("FinInstnId")?;
            b.leaf("BICFI", bicfi)?;
            b.close("FinInstnId")?;
            b.close("FIId")?;
            b.close(tag)?;
        }
        b.leaf("BizMsgIdr", &r.msg_id)?;
        b.leaf("MsgDefIdr", MESSAGE_DEFINITION)?;
        b.leaf("BizSvc", BUSINESS_SERVICE)?;
        b.leaf("CreDt", creation_time)?;
        b.close("AppHdr")?;
        b.finish()
    }

    fn build_document(
        &self,
        creation_time: &str,
        interbank_amount: Decimal,
        uetr: &dyn UetrSource,
    ) -> Result<String> {
        let r = &self.record;
        let ctx = self.context;
        let is_fedwire = matches!(ctx, ChannelContext::Fedwire(_));
        let settlement_ccy = r.effective_settlement_currency();
        let msg_id_prefix: String = r.msg_id.chars().take(10).collect();

        let debtor_account =
            select_account_representation(&r.debtor_account, &r.debtor_country, ctx);
        let creditor_account =
            select_account_representation(&r.creditor_account, &r.creditor_country, ctx);
        let debtor_agent =
            select_agent_representation(AgentRole::DebtorAgent, ctx, &r.debtor_agent());
        let creditor_agent =
            select_agent_representation(AgentRole::CreditorAgent, ctx, &r.creditor_agent());
        let instructing_agent = select_group_agent(
            ctx,
            &r.instructing_agent_bicfi,
            &r.instructing_agent_member_id,
        );
        let instructed_agent = select_group_agent(
            ctx,
            &r.instructed_agent_bicfi,
            &r.instructed_agent_member_id,
        );

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
        b.open("FIToFICstmrCdtTrf")?;

        b.open("GrpHdr")?;
        b.leaf("MsgId", &r.msg_id)?;
        b.leaf("CreDtTm", creation_time)?;
        b.leaf("NbOfTxs", "1")?;
        b.open("SttlmInf")?;
        b.leaf("SttlmMtd", &r.settlement_method)?;
        if is_fedwire {
            b.open("ClrSys")?;
            b.leaf("Cd", "FDW")?;
            b.close("ClrSys")?;
        }
        b.close("SttlmInf")?;
        b.close("GrpHdr")?;

        b.open("CdtTrfTxInf")?;
        b.open("PmtId")?;
        b.leaf("InstrId", &format!("INSTID{}", msg_id_prefix))?;
        b.leaf("EndToEndId", &format!("E2EID{}", msg_id_prefix))?;
        b.leaf("UETR", &uetr.next_uetr())?;
        b.close("PmtId")?;
        b.open("PmtTpInf")?;
        b.open("SvcLvl")?;
        b.leaf("Cd", "NURG")?;
        b.close("SvcLvl")?;
        if is_fedwire {
            b.open("LclInstrm")?;
            b.leaf("Prtry", "CTRC")?;
            b.close("LclInstrm")?;
        }
        b.close("PmtTpInf")?;
        b.leaf_with_attrs(
            "IntrBkSttlmAmt",
            &[("Ccy", settlement_ccy)],
            &format!("{:.2}", interbank_amount),
        )?;
        b.leaf("IntrBkSttlmDt", &r.interbank_settlement_date)?;
        b.leaf_with_attrs(
            "InstdAmt",
            &[("Ccy", &r.instructed_currency)],
            &format!("{:.2}", r.instructed_amount),
        )?;
        b.leaf("ChrgBr", "SHAR")?;

        write_agent(&mut b, "InstgAgt", &instructing_agent)?;
        write_agent(&mut b, "InstdAgt", &instructed_agent)?;

        b.open("Dbtr")?;
        b.leaf("Nm", &r.debtor_name)?;
        write_party_address(
            &mut b,
            &r.debtor_street,
            &r.debtor_building_number,
            &r.debtor_post_code,
            &r.debtor_town,
            &r.debtor_country,
        )?;
        b.close("Dbtr")?;
        write_account(&mut b, "DbtrAcct", &debtor_account)?;
        write_agent(&mut b, "DbtrAgt", &debtor_agent)?;
        write_agent(&mut b, "CdtrAgt", &creditor_agent)?;
        b.open("Cdtr")?;
        b.leaf("Nm", &r.creditor_name)?;
        write_party_address(
            &mut b,
            &r.creditor_street,
            &r.creditor_building_number,
            &r.creditor_post_code,
            &r.creditor_town,
            &r.creditor_country,
        )?;
        b.close("Cdtr")?;
        write_account(&mut b, "CdtrAcct", &creditor_account)?;

        b.open("RmtInf")?;
        b.leaf("Ustrd", &r.remittance_info)?;
        b.close("RmtInf")?;

        b.close("CdtTrfTxInf")?;
        b.close("FIToFICstmrCdtTrf")?;
        b.close("Document")?;
        b.finish()
    }
}

fn write_party_address(
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

fn write_account(b: &mut XmlBuilder, tag: &str, repr: &AccountRepresentation) -> Result<()> {
    b.open(tag)?;
    b.open("Id")?;
    match repr {
        AccountRepresentation::Iban(value) => b.leaf("IBAN", value)?,
        AccountRepresentation::Other(value) => {
            b.open("Othr")?;
            b.leaf("Id", value)?;
            b.close("Othr")?;
        }
    }
    b.close("Id")?;
    b.close(tag)
}

fn write_agent(b: &mut XmlBuilder, tag: &str, repr: &AgentRepresentation) -> Result<()> {
    b.open(tag)?;
    match repr {
        AgentRepresentation::Bicfi(bicfi) => {
            b.open("FinInstnId")?;
            b.leaf("BICFI", bicfi)?;
            b.close("FinInstnId")?;
        }
        AgentRepresentation::UsabaClearing {
            member_id,
            name,
            address,
        } => {
            b.open("FinInstnId")?;
            write_clearing_member(b, member_id)?;
            b.leaf("Nm", name)?;
            write_party_address(
                b,
                &address.street,
                &address.building_number,
                &address.post_code,
                &address.town,
                &address.country,
            )?;
            b.close("FinInstnId")?;
        }
        AgentRepresentation::UsabaMember(member_id) => {
            b.open("FinInstnId")?;
            write_clearing_member(b, member_id)?;
            b.close("FinInstnId")?;
        }
        AgentRepresentation::Absent => {}
    }
    b.close(tag)
}

fn write_clearing_member(b: &mut XmlBuilder, member_id: &str) -> Result<()> {
    b.open("ClrSysMmbId")?;
    b.open("ClrSysId")?;
    b.leaf("Cd", "USABA")?;
    b.close("ClrSysId")?;
    b.leaf("MmbId", member_id)?;
    b.close("ClrSysMmbId")
}
