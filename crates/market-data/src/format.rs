//! Display formatting for overview figures. Anything unparsable renders as "N/A".

const NOT_AVAILABLE: &str = "N/A";

/// Insert thousands separators into a run of ASCII digits.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn with_commas(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (formatted, None),
    };
    let sign = if value < 0.0 { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, group_thousands(&int_part), f),
        None => format!("{}{}", sign, group_thousands(&int_part)),
    }
}

/// Integer counts: "3.02B", "512.40M", or "12,345".
pub fn format_large_number(raw: &str) -> String {
    let number: i64 = match raw.trim().parse() {
        Ok(n) => n,
        Err(_) => return NOT_AVAILABLE.to_string(),
    };
    if number >= 1_000_000_000 {
        format!("{:.2}B", number as f64 / 1_000_000_000.0)
    } else if number >= 1_000_000 {
        format!("{:.2}M", number as f64 / 1_000_000.0)
    } else {
        with_commas(number as f64, 0)
    }
}

/// A fraction such as "0.0052" as "0.52%".
pub fn format_percentage(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => format!("{:.2}%", v * 100.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// "$1,234.50"
pub fn format_dollars(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => format!("${}", with_commas(v, 2)),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_numbers() {
        assert_eq!(format_large_number("3020000000000"), "3020.00B");
        assert_eq!(format_large_number("2500000000"), "2.50B");
        assert_eq!(format_large_number("1500000"), "1.50M");
        assert_eq!(format_large_number("12345"), "12,345");
        assert_eq!(format_large_number("999"), "999");
        assert_eq!(format_large_number("None"), "N/A");
        assert_eq!(format_large_number("-"), "N/A");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(format_percentage("0.0052"), "0.52%");
        assert_eq!(format_percentage("0"), "0.00%");
        assert_eq!(format_percentage("None"), "N/A");
    }

    #[test]
    fn test_dollars() {
        assert_eq!(format_dollars("1234.5"), "$1,234.50");
        assert_eq!(format_dollars("199.62"), "$199.62");
        assert_eq!(format_dollars("1000000"), "$1,000,000.00");
        assert_eq!(format_dollars("N/A"), "N/A");
    }
}
