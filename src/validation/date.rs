use chrono::{DateTime, NaiveDate};

use crate::models::DEFAULT_DATE_FORMAT;

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

/// Parse a date of birth returned by the lookup API.
///
/// `format` is the API's `dateFormat` hint. For the default `dd/MM/yyyy`
/// layout the components are range-checked and the date must exist on the
/// calendar. Any other layout falls back to a best-effort parse.
pub fn parse_date(date_str: &str, format: Option<&str>) -> Option<NaiveDate> {
    if date_str.is_empty() {
        return None;
    }

    let format = format.filter(|f| !f.is_empty()).unwrap_or(DEFAULT_DATE_FORMAT);
    let parts: Vec<&str> = date_str.split('/').collect();

    if format == DEFAULT_DATE_FORMAT && parts.len() == 3 {
        return parse_day_month_year(&parts);
    }

    parse_fallback(date_str, format)
}

fn parse_day_month_year(parts: &[&str]) -> Option<NaiveDate> {
    let day = parts[0].trim().parse::<u32>().ok()?;
    // Zero-based month, as the form date picker counts them
    let month0 = parts[1].trim().parse::<u32>().ok()?.checked_sub(1)?;
    let year = parts[2].trim().parse::<i32>().ok()?;

    if !(1..=31).contains(&day) || month0 > 11 || !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }

    // from_ymd_opt refuses overflowed dates such as 30/02
    NaiveDate::from_ymd_opt(year, month0 + 1, day)
}

fn parse_fallback(date_str: &str, format: &str) -> Option<NaiveDate> {
    let date_str = date_str.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(date_str) {
        return Some(datetime.date_naive());
    }

    let hinted = chrono_format(format);
    let candidates = [hinted.as_str(), "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

    candidates
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_str, fmt).ok())
}

/// Translate a `dd/MM/yyyy` style hint into a chrono format string.
fn chrono_format(hint: &str) -> String {
    hint.replace("yyyy", "%Y")
        .replace("yy", "%y")
        .replace("MM", "%m")
        .replace("dd", "%d")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_default_format() {
        let date = parse_date("15/03/1990", None).unwrap();
        assert_eq!(date.year(), 1990);
        assert_eq!(date.month0(), 2);
        assert_eq!(date.day(), 15);

        let date = parse_date("15/03/1990", Some("dd/MM/yyyy")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1990, 3, 15).unwrap());
    }

    #[test]
    fn test_impossible_dates_rejected() {
        assert_eq!(parse_date("30/02/2020", None), None);
        assert_eq!(parse_date("29/02/2019", None), None);
        assert_eq!(parse_date("31/04/2001", None), None);
        assert!(parse_date("29/02/2020", None).is_some());
    }

    #[test]
    fn test_out_of_range_components() {
        assert_eq!(parse_date("00/01/2000", None), None);
        assert_eq!(parse_date("32/01/2000", None), None);
        assert_eq!(parse_date("10/00/2000", None), None);
        assert_eq!(parse_date("10/13/2000", None), None);
        assert_eq!(parse_date("10/01/1899", None), None);
        assert_eq!(parse_date("10/01/2101", None), None);
        assert_eq!(parse_date("aa/01/2000", None), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_date("", None), None);
        assert_eq!(parse_date("", Some("yyyy-MM-dd")), None);
    }

    #[test]
    fn test_fallback_formats() {
        let expected = NaiveDate::from_ymd_opt(1985, 7, 4).unwrap();
        assert_eq!(parse_date("1985-07-04", Some("yyyy-MM-dd")), Some(expected));
        assert_eq!(parse_date("04.07.1985", Some("dd.MM.yyyy")), Some(expected));
        assert_eq!(
            parse_date("1985-07-04T10:00:00Z", Some("iso")),
            Some(expected)
        );
        assert_eq!(parse_date("1985-07-04", None), Some(expected));
    }

    #[test]
    fn test_fallback_rejects_garbage() {
        assert_eq!(parse_date("not a date", Some("yyyy-MM-dd")), None);
        assert_eq!(parse_date("1985-02-30", Some("yyyy-MM-dd")), None);
    }
}
