use chrono::TimeDelta;

/// Seconds in one hour, the unit every watch-time figure is reported in.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Express a watch duration in fractional hours.
pub fn hours(duration: TimeDelta) -> f64 {
    duration.num_seconds() as f64 / SECONDS_PER_HOUR
}

/// `part / whole * 100`, or `0.0` when `whole` is zero.
///
/// # Examples
///
/// ```
/// use viewing_core::formatting::percent_of;
///
/// assert_eq!(percent_of(900.0, 3600.0), 25.0);
/// assert_eq!(percent_of(10.0, 0.0), 0.0);
/// ```
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    part / whole * 100.0
}

/// Format a number with thousands separators and a fixed number of decimals.
///
/// # Examples
///
/// ```
/// use viewing_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    // "-0.00" reads badly; only sign values that survive rounding.
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Hours with two decimals, e.g. `"1,204.75"`.
pub fn format_hours(hours: f64) -> String {
    format_number(hours, 2)
}

/// A percentage with one decimal, e.g. `"14.3%"`.
pub fn format_percent(percent: f64) -> String {
    format!("{}%", format_number(percent, 1))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
