use log::warn;
use regex::Regex;

/// Checks candidate IDs against the configured pattern (e.g. a CURP regex).
///
/// The pattern is compiled once. A missing or malformed pattern leaves the
/// validator disabled, and every candidate is then rejected.
#[derive(Debug, Clone)]
pub struct PatternValidator {
    pattern: Option<Regex>,
}

impl PatternValidator {
    pub fn new(pattern: Option<&str>) -> Self {
        let pattern = match pattern.filter(|p| !p.is_empty()) {
            Some(source) => match Regex::new(source) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    warn!(
                        "Invalid external ID regex pattern {:?} (lookaround and backreferences \
                         are not supported), every ID will be rejected: {}",
                        source, err
                    );
                    None
                }
            },
            None => None,
        };

        PatternValidator { pattern }
    }

    pub fn is_enabled(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn is_valid(&self, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        match &self.pattern {
            Some(regex) => regex.is_match(value.trim()),
            None => false,
        }
    }
}
