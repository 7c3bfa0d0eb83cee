//! Price parsing and markup
//!
//! Displayed prices look like `"1 000 ₽"` or `"12.50 $"`. Parsing strips all
//! whitespace (including no-break spaces used as thousands separators) and
//! currency symbols, then reads what remains as a plain decimal number.
//! The markup is applied in exact decimal arithmetic and rounded half-up to
//! two places, so `1.005` style inputs do not drift through binary floats.

/// Markup applied to every displayed price, in percent (1.5x)
pub const MARKUP_PERCENT: u128 = 150;

/// Characters removed before parsing
const CURRENCY_SYMBOLS: &[char] = &[
    '₽', '$', '€', '£', '¥', '₴', '₸', '₹', '₩', '₺', '₪', '¢', '₿',
];

/// Parses a displayed price and applies the markup
///
/// Returns `None` when the text is not a non-negative decimal number after
/// cleaning. `None` is the "unknown price" outcome, never an error.
///
/// # Examples
///
/// ```
/// use catalog_harvester::price::parse_price;
///
/// assert_eq!(parse_price("1 000 ₽"), Some(1500.0));
/// assert_eq!(parse_price("-"), None);
/// ```
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && !CURRENCY_SYMBOLS.contains(c))
        .collect();

    let (mantissa, scale) = parse_decimal(&cleaned)?;

    match apply_markup(mantissa, scale) {
        Some(cents) => Some(cents as f64 / 100.0),
        // Too many digits for exact arithmetic; fall back to binary floats
        None => {
            let value: f64 = cleaned.trim_start_matches('+').parse().ok()?;
            let marked = (value * MARKUP_PERCENT as f64).round() / 100.0;
            marked.is_finite().then_some(marked)
        }
    }
}

/// Splits `[+]digits[.digits]` into an integer mantissa and a decimal scale
///
/// `"12.50"` becomes `(1250, 2)`. Mantissa overflow is reported as
/// `Some((u128::MAX, usize::MAX))` so the caller can fall back.
fn parse_decimal(s: &str) -> Option<(u128, usize)> {
    let s = s.strip_prefix('+').unwrap_or(s);
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let mut mantissa: u128 = 0;
    for digit in int_part.chars().chain(frac_part.chars()) {
        let d = digit.to_digit(10)? as u128;
        match mantissa.checked_mul(10).and_then(|m| m.checked_add(d)) {
            Some(m) => mantissa = m,
            None => return Some((u128::MAX, usize::MAX)),
        }
    }

    Some((mantissa, frac_part.len()))
}

/// Returns `round_half_up(mantissa / 10^scale * 1.5, 2)` expressed in cents
fn apply_markup(mantissa: u128, scale: usize) -> Option<u128> {
    let denominator = 10u128.checked_pow(u32::try_from(scale).ok()?)?;
    let numerator = mantissa.checked_mul(MARKUP_PERCENT)?;

    // floor((2n + d) / 2d) == round_half_up(n / d) for non-negative values
    let doubled = numerator.checked_mul(2)?.checked_add(denominator)?;
    Some(doubled / denominator.checked_mul(2)?)
}
