//! Currency conversion between the instructed and settlement legs.
//!
//! The instructed amount is what the beneficiary receives; when the
//! interbank settlement leg is denominated in another currency, the
//! settlement amount is derived from a quoted rate. Quotes come from an
//! external provider behind [`RateProvider`], with a static fallback
//! table when the provider is unreachable.

use chrono::Utc;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{ChannelContext, ExchangeQuote, FedwireSubtype, RateSource};

/// Provider timeout budget; a single attempt per call, no retries.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(5);

const DEFAULT_RATE_API_URL: &str = "https://api.exchangerate-api.com/v4/latest";

/// Static fallback rates as (from, to, mantissa, scale). Reverse
/// directions are served via the reciprocal.
const FALLBACK_RATES: &[(&str, &str, i64, u32)] = &[
    ("USD", "EUR", 92, 2),
    ("EUR", "USD", 108, 2),
    ("USD", "GBP", 79, 2),
    ("GBP", "USD", 127, 2),
    ("USD", "JPY", 14950, 2),
    ("USD", "CHF", 88, 2),
    ("USD", "CAD", 136, 2),
    ("USD", "AUD", 152, 2),
    ("EUR", "GBP", 86, 2),
    ("EUR", "CHF", 96, 2),
];

/// External source of exchange rates for a base currency.
pub trait RateProvider {
    /// Fetch the rate map for `base`, keyed by quote currency.
    fn fetch_rates(&self, base: &str) -> Result<HashMap<String, Decimal>>;
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

/// HTTP rate provider consuming a JSON `{"rates": {"EUR": 0.92, ...}}`
/// endpoint, read-only, with a bounded timeout.
pub struct HttpRateProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpRateProvider {
    /// Create a provider against the default endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_RATE_API_URL)
    }

    /// Create a provider against an explicit endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .map_err(|e| Error::RateProvider(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl RateProvider for HttpRateProvider {
    fn fetch_rates(&self, base: &str) -> Result<HashMap<String, Decimal>> {
        let url = format!("{}/{}", self.base_url, base);
        let response: RatesResponse = self
            .client
            .get(&url)
            .send()
            .map_err(|e| Error::RateProvider(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::RateProvider(e.to_string()))?
            .json()
            .map_err(|e| Error::RateProvider(e.to_string()))?;

        Ok(response
            .rates
            .into_iter()
            .filter_map(|(ccy, rate)| Decimal::from_f64(rate).map(|r| (ccy, r)))
            .collect())
    }
}

/// Whether a settlement-amount conversion applies.
///
/// The decision is purely "the currencies differ"; the channel context is
/// accepted for rule symmetry but has no discriminating effect. Fedwire
/// domestic is single-currency by construction, so a mismatch there is
/// logged as suspicious rather than refused.
pub fn needs_conversion(ctx: ChannelContext, settlement_ccy: &str, instructed_ccy: &str) -> bool {
    let differs = settlement_ccy != instructed_ccy;
    if differs && ctx == ChannelContext::Fedwire(FedwireSubtype::Domestic) {
        tracing::warn!(
            settlement_ccy,
            instructed_ccy,
            "currency mismatch on a Fedwire domestic payment"
        );
    }
    differs
}

/// Derive the interbank settlement amount from the instructed amount.
///
/// Equal currencies return the instructed amount unchanged. With a
/// positive quoted rate (settlement per instructed unit), the settlement
/// amount is `instructed / rate`, rounded half-up to 2 decimals. Without
/// a usable rate the instructed amount passes through unchanged as a
/// degraded fallback; the caller is expected to have warned upstream.
pub fn settlement_amount(
    instructed_amount: Decimal,
    settlement_ccy: &str,
    instructed_ccy: &str,
    quote: Option<&ExchangeQuote>,
) -> Decimal {
    if settlement_ccy == instructed_ccy {
        return instructed_amount;
    }

    match quote {
        Some(quote) if quote.rate > Decimal::ZERO => (instructed_amount / quote.rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        _ => {
            tracing::warn!(
                settlement_ccy,
                instructed_ccy,
                "no usable rate, settling at the instructed amount"
            );
            instructed_amount
        }
    }
}

/// Fetch a quote for `from`→`to`, falling back to the static table.
///
/// Same-currency pairs short-circuit to 1.0 without contacting the
/// provider. Otherwise a single provider attempt is made; on failure or
/// a missing pair the fallback table answers, using the reciprocal for
/// untabulated directions. Errors only when both sources miss.
pub fn fetch_rate(provider: &dyn RateProvider, from: &str, to: &str) -> Result<ExchangeQuote> {
    if from == to {
        return Ok(ExchangeQuote {
            rate: Decimal::ONE,
            timestamp: Utc::now(),
            source: RateSource::Identity,
        });
    }

    match provider.fetch_rates(from) {
        Ok(rates) => {
            if let Some(rate) = rates.get(to) {
                return Ok(ExchangeQuote {
                    rate: *rate,
                    timestamp: Utc::now(),
                    source: RateSource::Provider,
                });
            }
            tracing::warn!(from, to, "provider has no rate for pair, using fallback");
        }
        Err(e) => {
            tracing::warn!(from, to, error = %e, "rate provider failed, using fallback");
        }
    }

    match fallback_rate(from, to) {
        Some(rate) => Ok(ExchangeQuote {
            rate,
            timestamp: Utc::now(),
            source: RateSource::Fallback,
        }),
        None => Err(Error::RateUnavailable {
            from: from.to_string(),
            to: to.to_string(),
        }),
    }
}

/// Look up the static fallback rate for a pair, reciprocating the
/// reverse entry when only that direction is tabulated.
pub fn fallback_rate(from: &str, to: &str) -> Option<Decimal> {
    for &(f, t, mantissa, scale) in FALLBACK_RATES {
        if f == from && t == to {
            return Some(Decimal::new(mantissa, scale));
        }
    }
    for &(f, t, mantissa, scale) in FALLBACK_RATES {
        if f == to && t == from {
            return Some(Decimal::ONE / Decimal::new(mantissa, scale));
        }
    }
    None
}
