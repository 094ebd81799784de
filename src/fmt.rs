/// Group the integer digits of a non-negative amount with commas, two decimals.
fn grouped(abs: f64) -> String {
    let cents = format!("{:.2}", abs);
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();
    format!("{with_commas}.{dec_part}")
}

/// Format a float as a currency amount with thousands separators: ₹1,234.56
pub fn money(val: f64, symbol: &str) -> String {
    let body = grouped(val.abs());
    if val < 0.0 {
        format!("-{symbol}{body}")
    } else {
        format!("{symbol}{body}")
    }
}

pub fn percent(val: f64) -> String {
    format!("{val:.2}%")
}
