/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// Rounding is half-to-even on the exact binary value, so `2.5` becomes `"2"`
/// and `1.005` (stored just below) becomes `"1.00"`.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let fixed = format!("{:.prec$}", value.abs(), prec = decimals as usize);

    let result = match fixed.split_once('.') {
        Some((integer, fraction)) => format!("{}.{}", group_thousands(integer), fraction),
        None => group_thousands(&fixed),
    };

    if negative && result.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format an engagement total the way insight sentences quote it: whole
/// numbers with thousands separators.
///
/// ```
/// use dashboard_core::formatting::format_engagements;
///
/// assert_eq!(format_engagements(15.0), "15");
/// assert_eq!(format_engagements(1_234_567.4), "1,234,567");
/// ```
pub fn format_engagements(value: f64) -> String {
    format_number(value, 0)
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// Share of `part` in `whole` as a one-decimal percentage string, e.g. `"33.3"`.
///
/// Rounds once, half-to-even, like [`format_number`]. `"0.0"` when `whole` is zero.
pub fn format_share(part: f64, whole: f64) -> String {
    if whole == 0.0 {
        return "0.0".to_string();
    }
    format!("{:.1}", part / whole * 100.0)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
