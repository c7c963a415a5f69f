use url::Url;

use crate::error::ServiceError;

/// Longest accepted interval: one day
pub const MAX_INTERVAL_MINUTES: u32 = 1440;

/// Validation results with specific error messages
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self { is_valid: true, error: None }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self { is_valid: false, error: Some(msg.into()) }
    }

    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(ServiceError::BadRequest(
                self.error.unwrap_or_else(|| "Validation failed".to_string()),
            ))
        }
    }
}

/// Validate an HTTP/HTTPS URL (expected to be scheme-normalized already)
pub fn validate_http_endpoint(target: &str) -> ValidationResult {
    if target.trim().is_empty() {
        return ValidationResult::err("url is required");
    }

    match Url::parse(target) {
        Ok(url) => {
            let scheme = url.scheme();
            if scheme != "http" && scheme != "https" {
                return ValidationResult::err(format!(
                    "Invalid scheme '{scheme}'. Must be http or https"
                ));
            }

            if url.host_str().is_none_or(str::is_empty) {
                return ValidationResult::err("URL must have a valid host");
            }

            ValidationResult::ok()
        }
        Err(e) => ValidationResult::err(format!("Invalid URL: {e}")),
    }
}

/// Validate monitor name
pub fn validate_monitor_name(name: &str) -> ValidationResult {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return ValidationResult::err("name is required");
    }

    if trimmed.chars().count() > 100 {
        return ValidationResult::err("Name too long (max 100 characters)");
    }

    ValidationResult::ok()
}

/// Validate monitor interval in minutes
pub fn validate_interval(interval: u32) -> ValidationResult {
    if interval == 0 {
        return ValidationResult::err("Interval must be at least 1 minute");
    }

    if interval > MAX_INTERVAL_MINUTES {
        return ValidationResult::err("Interval too long (max 24 hours)");
    }

    ValidationResult::ok()
}

/// Validate probe timeout in seconds
pub fn validate_timeout(timeout_seconds: u64) -> ValidationResult {
    const MIN_TIMEOUT: u64 = 1;
    const MAX_TIMEOUT: u64 = 300; // 5 minutes

    if timeout_seconds < MIN_TIMEOUT {
        return ValidationResult::err(format!(
            "Timeout too short: {timeout_seconds} seconds (minimum: {MIN_TIMEOUT})"
        ));
    }

    if timeout_seconds > MAX_TIMEOUT {
        return ValidationResult::err(format!(
            "Timeout too long: {timeout_seconds} seconds (maximum: {MAX_TIMEOUT})"
        ));
    }

    ValidationResult::ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_validation() {
        assert!(validate_http_endpoint("http://example.com").is_valid);
        assert!(validate_http_endpoint("https://example.com").is_valid);
        assert!(validate_http_endpoint("http://192.168.1.1").is_valid);
        assert!(validate_http_endpoint("http://example.com:8080/path").is_valid);

        assert!(!validate_http_endpoint("").is_valid);
        assert!(!validate_http_endpoint("example.com").is_valid);
        assert!(!validate_http_endpoint("ftp://example.com").is_valid);
        assert!(!validate_http_endpoint("https://").is_valid);
    }

    #[test]
    fn test_name_validation() {
        assert!(validate_monitor_name("My Monitor").is_valid);
        assert!(validate_monitor_name("Test123").is_valid);

        assert!(!validate_monitor_name("").is_valid);
        assert!(!validate_monitor_name("   ").is_valid);
        assert!(!validate_monitor_name(&"x".repeat(101)).is_valid);
    }

    #[test]
    fn test_interval_validation() {
        assert!(validate_interval(1).is_valid);
        assert!(validate_interval(MAX_INTERVAL_MINUTES).is_valid);

        assert!(!validate_interval(0).is_valid);
        assert!(!validate_interval(MAX_INTERVAL_MINUTES + 1).is_valid);
    }

    #[test]
    fn test_timeout_validation() {
        assert!(validate_timeout(10).is_valid);
        assert!(!validate_timeout(0).is_valid);
        assert!(!validate_timeout(301).is_valid);
    }

    #[test]
    fn test_into_result() {
        assert!(validate_interval(5).into_result().is_ok());
        let err = validate_interval(0).into_result().unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(msg) if msg.contains("at least 1 minute")));
    }
}
