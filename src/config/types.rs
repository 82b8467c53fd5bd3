use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Flight-Booker
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    pub gateway: GatewayConfig,
    pub trip: TripConfig,
    pub passengers: Vec<Passenger>,
    pub contact: ContactConfig,
    pub payment: PaymentConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Booking site entry point
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// URL of the booking widget page
    pub url: String,

    /// Airport code chosen in the origin selector
    #[serde(default = "default_origin")]
    pub origin: String,
}

/// Expected flight times
///
/// Both instants carry their own UTC offset; they are normalized to the
/// reference timezone before any comparison or formatting.
#[derive(Debug, Clone, Deserialize)]
pub struct TripConfig {
    /// Expected departure of the outbound flight
    #[serde(rename = "expected-departure")]
    pub expected_departure: DateTime<FixedOffset>,

    /// Expected departure of the return flight
    #[serde(rename = "expected-arrival")]
    pub expected_arrival: DateTime<FixedOffset>,
}

/// A traveler, filled into the passenger form at position `index`
#[derive(Debug, Clone, Deserialize)]
pub struct Passenger {
    /// Zero-based form position
    pub index: usize,

    pub surname: String,

    #[serde(rename = "given-name")]
    pub given_name: String,

    /// Value of the title selector (e.g. "MR", "MS")
    pub sex: String,

    /// Birth date as typed into the form, `YYYY/MM/DD`
    #[serde(rename = "birth-date")]
    pub birth_date: String,

    #[serde(rename = "national-id")]
    pub national_id: String,
}

/// Contact details for the booking
#[derive(Debug, Clone, Deserialize)]
pub struct ContactConfig {
    pub mobile: String,
    pub email: String,
}

/// Credit card details
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Numeric card type code, see [`CardType::from_code`]
    #[serde(rename = "card-type")]
    pub card_type: u8,

    pub number: String,

    #[serde(rename = "expiry-month")]
    pub expiry_month: String,

    #[serde(rename = "expiry-year")]
    pub expiry_year: String,

    pub cvv: String,
}

impl PaymentConfig {
    /// Resolves the configured card type code
    pub fn card_type(&self) -> Option<CardType> {
        CardType::from_code(self.card_type)
    }

    /// Card number with everything but the last four digits hidden
    pub fn masked_number(&self) -> String {
        let hidden = self.number.chars().count().saturating_sub(4);
        let tail: String = self.number.chars().skip(hidden).collect();
        format!("{}{}", "*".repeat(hidden), tail)
    }
}

/// Browser launch and synchronization settings
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Path to a Chrome/Chromium executable; auto-detected when absent
    #[serde(default)]
    pub executable: Option<PathBuf>,

    /// Run without a visible window
    #[serde(default)]
    pub headless: bool,

    /// Maximum time to wait for an expected element (milliseconds)
    #[serde(rename = "wait-timeout-ms", default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,

    /// Interval between element polls while waiting (milliseconds)
    #[serde(rename = "poll-interval-ms", default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Extra pause after each flight selection (milliseconds, 0 disables)
    #[serde(rename = "settle-ms", default)]
    pub settle_ms: u64,
}

impl BrowserConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Returns the settle pause, or `None` when disabled
    pub fn settle_delay(&self) -> Option<Duration> {
        (self.settle_ms > 0).then(|| Duration::from_millis(self.settle_ms))
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            executable: None,
            headless: false,
            wait_timeout_ms: default_wait_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            settle_ms: 0,
        }
    }
}

fn default_origin() -> String {
    "RMQ".to_string()
}

fn default_wait_timeout_ms() -> u64 {
    15_000
}

fn default_poll_interval_ms() -> u64 {
    250
}

/// Card networks accepted by the payment form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    Visa,
    MasterCard,
    AmericanExpress,
    Jcb,
}

impl CardType {
    /// Maps a configured numeric code to a card type
    ///
    /// Only codes 1 through 4 are defined; anything else yields `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Visa),
            2 => Some(Self::MasterCard),
            3 => Some(Self::AmericanExpress),
            4 => Some(Self::Jcb),
            _ => None,
        }
    }

    /// Two-letter value of the card type selector
    pub fn carrier_code(&self) -> &'static str {
        match self {
            Self::Visa => "VI",
            Self::MasterCard => "CA",
            Self::AmericanExpress => "AX",
            Self::Jcb => "JB",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Visa => "VISA",
            Self::MasterCard => "MasterCard",
            Self::AmericanExpress => "American Express",
            Self::Jcb => "JCB",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_type_codes() {
        assert_eq!(CardType::from_code(1), Some(CardType::Visa));
        assert_eq!(CardType::from_code(2), Some(CardType::MasterCard));
        assert_eq!(CardType::from_code(3), Some(CardType::AmericanExpress));
        assert_eq!(CardType::from_code(4), Some(CardType::Jcb));

        assert_eq!(CardType::from_code(0), None);
        assert_eq!(CardType::from_code(5), None);
    }

    #[test]
    fn test_carrier_codes() {
        assert_eq!(CardType::Visa.carrier_code(), "VI");
        assert_eq!(CardType::MasterCard.carrier_code(), "CA");
        assert_eq!(CardType::AmericanExpress.carrier_code(), "AX");
        assert_eq!(CardType::Jcb.carrier_code(), "JB");
    }

    #[test]
    fn test_masked_number() {
        let payment = PaymentConfig {
            card_type: 1,
            number: "4111111111111111".to_string(),
            expiry_month: "12".to_string(),
            expiry_year: "2030".to_string(),
            cvv: "123".to_string(),
        };
        assert_eq!(payment.masked_number(), "************1111");
    }

    #[test]
    fn test_browser_defaults() {
        let browser = BrowserConfig::default();
        assert!(!browser.headless);
        assert_eq!(browser.wait_timeout(), Duration::from_secs(15));
        assert_eq!(browser.poll_interval(), Duration::from_millis(250));
        assert_eq!(browser.settle_delay(), None);
    }
}
