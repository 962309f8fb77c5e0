use crate::models::GenderOption;

/// `developerMessage` sent with a 200 when the ID does not exist.
pub const NOT_FOUND_SENTINEL: &str = "client.externalid.notfound";

/// `developerMessage` sent with a 200 when the API rejects the ID format.
pub const INVALID_SENTINEL: &str = "client.externalid.invalid";

/// Date format assumed when the API omits `dateFormat`.
pub const DEFAULT_DATE_FORMAT: &str = "dd/MM/yyyy";

/// Mapping from the external API's gender codes to gender names.
///
/// The external system and the banking API number genders differently, so
/// options are matched by name.
pub struct GenderCodeMap;

impl GenderCodeMap {
    const CODES: [(i64, &'static str); 2] = [(36, "Male"), (37, "Female")];

    pub fn name_for(code: i64) -> Option<&'static str> {
        Self::CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| *name)
    }

    /// Find the selectable option matching an external gender code.
    pub fn resolve(code: i64, options: &[GenderOption]) -> Option<&GenderOption> {
        let name = Self::name_for(code)?;
        options
            .iter()
            .find(|option| option.name.to_lowercase() == name.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(GenderCodeMap::name_for(36), Some("Male"));
        assert_eq!(GenderCodeMap::name_for(37), Some("Female"));
        assert_eq!(GenderCodeMap::name_for(1), None);
    }

    #[test]
    fn test_resolve_by_name_case_insensitive() {
        let options = vec![GenderOption::new(14, "MALE"), GenderOption::new(15, "female")];
        assert_eq!(GenderCodeMap::resolve(36, &options).map(|o| o.id), Some(14));
        assert_eq!(GenderCodeMap::resolve(37, &options).map(|o| o.id), Some(15));
    }

    #[test]
    fn test_resolve_without_match() {
        let options = vec![GenderOption::new(1, "Other")];
        assert!(GenderCodeMap::resolve(36, &options).is_none());
        assert!(GenderCodeMap::resolve(99, &options).is_none());
        assert!(GenderCodeMap::resolve(36, &[]).is_none());
    }
}
