use crate::config::types::BookingConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a booking file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML booking file
///
/// # Returns
///
/// * `Ok(BookingConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<BookingConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates booking configuration from TOML text
///
/// Validation runs here so that a bad card type or passenger list is rejected
/// before any browser is launched.
pub fn parse_config(content: &str) -> Result<BookingConfig, ConfigError> {
    let config: BookingConfig = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the booking file content
///
/// Logged at startup so a run can be tied back to the exact file it used.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a booking file and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(BookingConfig, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CardType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID_CONFIG: &str = r#"
[gateway]
url = "https://booking.example.com/"

[trip]
expected-departure = "2023-10-05T08:00:00+08:00"
expected-arrival = "2023-10-10T18:00:00+08:00"

[[passengers]]
index = 0
surname = "Wang"
given-name = "Xiaoming"
sex = "MR"
birth-date = "1990/01/15"
national-id = "A123456789"

[[passengers]]
index = 1
surname = "Lin"
given-name = "Meiling"
sex = "MS"
birth-date = "1992/06/30"
national-id = "B223456789"

[contact]
mobile = "912345678"
email = "traveler@example.com"

[payment]
card-type = 1
number = "4111111111111111"
expiry-month = "12"
expiry-year = "2030"
cvv = "123"
"#;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.gateway.origin, "RMQ");
        assert_eq!(config.passengers.len(), 2);
        assert_eq!(config.passengers[1].given_name, "Meiling");
        assert_eq!(config.payment.card_type(), Some(CardType::Visa));
        assert_eq!(config.browser.wait_timeout_ms, 15_000);
        assert_eq!(
            config.trip.expected_departure.to_rfc3339(),
            "2023-10-05T08:00:00+08:00"
        );
    }

    #[test]
    fn test_browser_section_overrides() {
        let content = format!(
            "{}\n[browser]\nheadless = true\nwait-timeout-ms = 5000\nsettle-ms = 500\n",
            VALID_CONFIG
        );
        let config = parse_config(&content).unwrap();

        assert!(config.browser.headless);
        assert_eq!(config.browser.wait_timeout_ms, 5000);
        assert_eq!(config.browser.poll_interval_ms, 250);
        assert_eq!(config.browser.settle_ms, 500);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/booking.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_offset_is_a_parse_error() {
        let content = VALID_CONFIG.replace("2023-10-05T08:00:00+08:00", "2023-10-05T08:00:00");
        assert!(matches!(parse_config(&content), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_card_type_rejected_at_load() {
        let content = VALID_CONFIG.replace("card-type = 1", "card-type = 7");
        let file = create_temp_config(&content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::UnknownCardType(7))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config(VALID_CONFIG);

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_load_config_with_hash() {
        let file = create_temp_config(VALID_CONFIG);
        let (config, hash) = load_config_with_hash(file.path()).unwrap();

        assert_eq!(config.passengers.len(), 2);
        assert_eq!(hash, compute_config_hash(file.path()).unwrap());
    }
}
