use crate::config::types::{
    BookingConfig, BrowserConfig, CardType, ContactConfig, GatewayConfig, Passenger,
    PaymentConfig, TripConfig,
};
use crate::ConfigError;
use chrono::NaiveDate;
use url::Url;

/// Validates the entire booking configuration
pub fn validate(config: &BookingConfig) -> Result<(), ConfigError> {
    validate_gateway(&config.gateway)?;
    validate_trip(&config.trip)?;
    validate_passengers(&config.passengers)?;
    validate_contact(&config.contact)?;
    validate_payment(&config.payment)?;
    validate_browser(&config.browser)?;
    Ok(())
}

/// Validates the gateway URL and origin code
fn validate_gateway(config: &GatewayConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid gateway url '{}': {}", config.url, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "Gateway url '{}' must use http or https",
            config.url
        )));
    }

    if config.origin.len() != 3 || !config.origin.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ConfigError::Validation(format!(
            "origin must be a three-letter airport code, got '{}'",
            config.origin
        )));
    }

    Ok(())
}

/// The return flight cannot leave before the outbound one
fn validate_trip(config: &TripConfig) -> Result<(), ConfigError> {
    if config.expected_arrival < config.expected_departure {
        return Err(ConfigError::Validation(format!(
            "expected-arrival ({}) is before expected-departure ({})",
            config.expected_arrival.to_rfc3339(),
            config.expected_departure.to_rfc3339()
        )));
    }
    Ok(())
}

/// Validates the passenger list
///
/// Indices address form rows, so they must be unique and cover `0..len`
/// exactly; the order of the list itself is the fill order.
fn validate_passengers(passengers: &[Passenger]) -> Result<(), ConfigError> {
    if passengers.is_empty() {
        return Err(ConfigError::Validation(
            "at least one passenger is required".to_string(),
        ));
    }

    let mut seen = vec![false; passengers.len()];
    for passenger in passengers {
        let slot = seen.get_mut(passenger.index).ok_or_else(|| {
            ConfigError::Validation(format!(
                "passenger index {} is out of range for {} passengers",
                passenger.index,
                passengers.len()
            ))
        })?;
        if *slot {
            return Err(ConfigError::Validation(format!(
                "duplicate passenger index {}",
                passenger.index
            )));
        }
        *slot = true;

        validate_passenger(passenger)?;
    }

    Ok(())
}

fn validate_passenger(passenger: &Passenger) -> Result<(), ConfigError> {
    let required = [
        ("surname", &passenger.surname),
        ("given-name", &passenger.given_name),
        ("sex", &passenger.sex),
        ("national-id", &passenger.national_id),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "passenger {}: {} cannot be empty",
                passenger.index, field
            )));
        }
    }

    NaiveDate::parse_from_str(&passenger.birth_date, "%Y/%m/%d").map_err(|_| {
        ConfigError::Validation(format!(
            "passenger {}: birth-date must be YYYY/MM/DD, got '{}'",
            passenger.index, passenger.birth_date
        ))
    })?;

    Ok(())
}

/// Validates contact details
fn validate_contact(config: &ContactConfig) -> Result<(), ConfigError> {
    let digits = config.mobile.strip_prefix('+').unwrap_or(&config.mobile);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::Validation(format!(
            "mobile must contain digits only, got '{}'",
            config.mobile
        )));
    }

    validate_email(&config.email)
}

/// Validates card details
fn validate_payment(config: &PaymentConfig) -> Result<(), ConfigError> {
    if CardType::from_code(config.card_type).is_none() {
        return Err(ConfigError::UnknownCardType(config.card_type));
    }

    if !is_digits(&config.number, 12..=19) {
        return Err(ConfigError::Validation(
            "card number must be 12 to 19 digits".to_string(),
        ));
    }

    let month_ok = config.expiry_month.len() == 2
        && matches!(config.expiry_month.parse::<u8>(), Ok(1..=12));
    if !month_ok {
        return Err(ConfigError::Validation(format!(
            "expiry-month must be 01-12, got '{}'",
            config.expiry_month
        )));
    }

    if !is_digits(&config.expiry_year, 4..=4) {
        return Err(ConfigError::Validation(format!(
            "expiry-year must be four digits, got '{}'",
            config.expiry_year
        )));
    }

    // Never echo the value itself
    if !is_digits(&config.cvv, 3..=4) {
        return Err(ConfigError::Validation(
            "cvv must be 3 or 4 digits".to_string(),
        ));
    }

    Ok(())
}

fn validate_browser(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.wait_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "wait-timeout-ms must be greater than 0".to_string(),
        ));
    }

    if config.poll_interval_ms == 0 || config.poll_interval_ms > config.wait_timeout_ms {
        return Err(ConfigError::Validation(format!(
            "poll-interval-ms must be between 1 and wait-timeout-ms, got {}",
            config.poll_interval_ms
        )));
    }

    Ok(())
}

fn is_digits(value: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&value.len()) && value.chars().all(|c| c.is_ascii_digit())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation("email cannot be empty".to_string()));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
