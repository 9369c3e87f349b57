//! Number string helpers shared by the money formatters.
//!
//! Input strings are plain `Decimal` renderings (`-1234.5`); output uses the
//! pt-BR convention of `.` for thousands and `,` for the fraction.

/// Trims trailing zeros of the fractional part (and a dangling point).
pub fn trim_fraction(formatted: String) -> String {
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

/// Adds thousands separators and swaps the decimal point for a comma.
pub fn localize(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };

    let mut parts = unsigned.splitn(2, '.');
    let integer = parts.next().unwrap_or_default();
    let fraction = parts.next();

    let grouped = integer
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|c| std::str::from_utf8(c).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(".");

    match fraction {
        Some(f) => format!("{}{},{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_fraction() {
        assert_eq!(trim_fraction("1.50".to_string()), "1.5");
        assert_eq!(trim_fraction("1.00".to_string()), "1");
        assert_eq!(trim_fraction("100".to_string()), "100");
        assert_eq!(trim_fraction("0.0".to_string()), "0");
    }

    #[test]
    fn test_localize_integers() {
        assert_eq!(localize("0"), "0");
        assert_eq!(localize("123"), "123");
        assert_eq!(localize("1000"), "1.000");
        assert_eq!(localize("1234567"), "1.234.567");
    }

    #[test]
    fn test_localize_fraction_and_sign() {
        assert_eq!(localize("1234.56"), "1.234,56");
        assert_eq!(localize("-1000.5"), "-1.000,5");
        assert_eq!(localize("-12.00"), "-12,00");
    }
}
