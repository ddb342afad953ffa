const UNIT_PREFIXES: [&str; 5] = ["", "K", "M", "G", "T"];

/// Format a byte count as `"<value> <unit>"` with two decimals.
///
/// Binary mode (the default in callers) divides by 1024 and uses the `KiB`
/// family; decimal mode divides by 1000 and uses `KB`. The exponent is
/// clamped to the tera band, so peta-scale values render as e.g.
/// `"1024.00 TiB"`. Zero, negative and non-finite input all yield `"0.00 B"`.
pub fn human_file_size(bytes: f64, decimal: bool) -> String {
    if !bytes.is_finite() || bytes <= 0.0 {
        return "0.00 B".to_string();
    }

    let base = if decimal { 1000.0 } else { 1024.0 };

    // floor(log_base(bytes)) without the rounding error of ln()/ln()
    let mut exponent = 0;
    while exponent < UNIT_PREFIXES.len() - 1 && bytes >= base_pow(base, exponent + 1) {
        exponent += 1;
    }

    let infix = if decimal || exponent == 0 { "" } else { "i" };
    format!(
        "{:.2} {}{}B",
        bytes / base_pow(base, exponent),
        UNIT_PREFIXES[exponent],
        infix
    )
}

fn base_pow(base: f64, exponent: usize) -> f64 {
    (0..exponent).fold(1.0, |acc, _| acc * base)
}

/// Right-aligned percentage suffix used in chart titles, e.g. `"  25.5%"`.
pub fn padded_percent(value: f64) -> String {
    format!("{:>6.1}%", value)
}
