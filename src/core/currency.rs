pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

const LAKH: f64 = 100_000.0;
const CRORE: f64 = 10_000_000.0;
const BILLION: f64 = 1_000_000_000.0;

/// Renders raw predictions on the Lakh / Crore / Billion display scale.
#[derive(Debug, Clone)]
pub struct CurrencyFormatter {
    symbol: String,
}

impl CurrencyFormatter {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Thresholds compare the absolute magnitude and include their lower bound;
    /// negative values keep a leading `-` ahead of the symbol.
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return format!("{}{}", self.symbol, value);
        }

        let sign = if value < 0.0 { "-" } else { "" };
        let magnitude = value.abs();

        if magnitude < LAKH {
            format!("{}{}{}", sign, self.symbol, group_thousands(magnitude))
        } else if magnitude < CRORE {
            format!("{}{}{:.2} Lakh", sign, self.symbol, magnitude / LAKH)
        } else if magnitude < BILLION {
            format!("{}{}{:.2} Crore", sign, self.symbol, magnitude / CRORE)
        } else {
            format!("{}{}{:.2} Billion", sign, self.symbol, magnitude / BILLION)
        }
    }
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_SYMBOL)
    }
}

/// `1234567.891` -> `1,234,567.89`. Expects a non-negative finite value.
fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit as char);
    }

    format!("{}.{}", grouped, frac_part)
}
