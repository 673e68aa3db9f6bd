// Output formatting — terminal display of the computed analytics.

pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..40]`), this respects UTF-8 character
/// boundaries and will never panic on multi-byte characters — video titles
/// here are mostly Korean.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// Format a count in Korean 억/만 units.
///
/// 2_830_000 → "283만", 123_456_789 → "1억 2345만", 999 → "999".
/// Sub-만 remainders are dropped once a unit part exists.
pub fn format_korean_count(n: u64) -> String {
    let mut n = n;
    let mut parts = Vec::new();

    if n >= 100_000_000 {
        parts.push(format!("{}억", n / 100_000_000));
        n %= 100_000_000;
    }
    if n >= 10_000 {
        parts.push(format!("{}만", n / 10_000));
        n %= 10_000;
    }

    if parts.is_empty() {
        group_thousands(n)
    } else {
        parts.join(" ")
    }
}

/// Thousands-grouped decimal rendering ("1,234,567").
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
