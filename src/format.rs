// ---------------------------------------------------------------------------
// Currency formatting
// ---------------------------------------------------------------------------

/// Symbol and separators of a currency/locale pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: &'static str,
    pub thousands_separator: char,
    pub decimal_separator: char,
}

/// Brazilian real in the pt_BR locale: `R$ 1.234,56`.
pub const BRL: CurrencyFormat = CurrencyFormat {
    symbol: "R$",
    thousands_separator: '.',
    decimal_separator: ',',
};

impl CurrencyFormat {
    /// Format with two decimals, grouped thousands and a leading minus for
    /// negative amounts.
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return format!("{} {value}", self.symbol);
        }

        let cents = (value.abs() * 100.0).round() as u64;
        let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
        format!(
            "{sign}{} {}{}{:02}",
            self.symbol,
            group_thousands(cents / 100, self.thousands_separator),
            self.decimal_separator,
            cents % 100
        )
    }
}

/// Format an amount in the dashboard currency.
pub fn format_brl(value: f64) -> String {
    BRL.format(value)
}

fn group_thousands(n: u64, separator: char) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// Thousands-grouped integer, e.g. order counts: `12.345`.
pub fn format_count(n: usize) -> String {
    group_thousands(n as u64, BRL.thousands_separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brl_formatting() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(38.71), "R$ 38,71");
        assert_eq!(format_brl(1234.5), "R$ 1.234,50");
        assert_eq!(format_brl(15_843_553.24), "R$ 15.843.553,24");
        assert_eq!(format_brl(999.999), "R$ 1.000,00");
    }

    #[test]
    fn test_negative_and_negative_zero() {
        assert_eq!(format_brl(-1234.5), "-R$ 1.234,50");
        assert_eq!(format_brl(-0.001), "R$ 0,00");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1.000");
        assert_eq!(format_count(99441), "99.441");
    }
}
