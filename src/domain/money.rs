use std::fmt;

/// Amounts are stored as plain floating-point numbers, the same shape the
/// JSON store has always used. Display code rounds to two decimals.
pub type Amount = f64;

/// Format an amount as a human-readable currency string.
/// Example: 42.5 -> "42.50", -3.0 -> "-3.00"
pub fn format_amount(amount: Amount) -> String {
    format!("{:.2}", amount)
}

/// Parse user input into an amount.
/// Example: "42.50" -> 42.5, " 7 " -> 7.0, "1e3" -> 1000.0, "1_000" -> 1000.0
///
/// Any real number is accepted (no range check), but "inf" and "nan"
/// are rejected so a stored amount is always finite.
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let amount: Amount = strip_digit_separators(input)
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| ParseAmountError::InvalidFormat(input.to_string()))?;

    if !amount.is_finite() {
        return Err(ParseAmountError::NotFinite(input.to_string()));
    }

    Ok(amount)
}

/// Drop `_` separators that sit between two digits ("1_000.5").
/// Any other underscore makes the input invalid.
fn strip_digit_separators(input: &str) -> Option<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());

    for (i, &c) in chars.iter().enumerate() {
        if c != '_' {
            out.push(c);
            continue;
        }
        let prev_is_digit = i > 0 && chars[i - 1].is_ascii_digit();
        let next_is_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
        if !(prev_is_digit && next_is_digit) {
            return None;
        }
    }

    Some(out)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidFormat(String),
    NotFinite(String),
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "amount is empty"),
            ParseAmountError::InvalidFormat(s) => write!(f, "'{}' is not a number", s),
            ParseAmountError::NotFinite(s) => write!(f, "'{}' is not a finite number", s),
        }
    }
}

impl std::error::Error for ParseAmountError {}
