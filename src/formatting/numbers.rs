/// Whole-dollar currency with thousands separators: `$1,234,567`.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(rounded.abs() as u64))
}

/// Like [`format_currency`] but always carries a sign for non-zero values.
pub fn format_currency_signed(value: f64) -> String {
    if value.round() > 0.0 {
        format!("+{}", format_currency(value))
    } else {
        format_currency(value)
    }
}

/// Whole number with thousands separators.
pub fn format_number(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{}", group_thousands(rounded.abs() as u64))
}

/// Percentage with one decimal place: `742.1%`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Difference between two percentages: `12.5 pts`.
pub fn format_points(value: f64) -> String {
    format!("{value:.1} pts")
}

/// Payback period; `None` means savings never cover the investment.
pub fn format_months(months: Option<f64>) -> String {
    match months {
        Some(m) => format!("{m:.1} months"),
        None => "never".to_string(),
    }
}

fn group_thousands(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut groups = Vec::new();
    while n > 0 {
        groups.push(n % 1000);
        n /= 1000;
    }
    let mut out = groups.pop().map(|g| g.to_string()).unwrap_or_default();
    for g in groups.iter().rev() {
        out.push_str(&format!(",{g:03}"));
    }
    out
}
