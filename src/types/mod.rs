pub mod bar;
pub mod model;
pub mod score;
pub mod sentiment;
pub mod signals;

pub use bar::*;
pub use model::*;
pub use score::*;
pub use sentiment::*;
pub use signals::*;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Uppercased ticker, or None when `raw` is not a plausible symbol
/// (1-10 characters of letters, digits, '.', '-' or a leading '^').
pub fn normalize_ticker(raw: &str) -> Option<String> {
    let ticker = raw.trim().to_uppercase();
    let body = ticker.strip_prefix('^').unwrap_or(&ticker);
    let valid = !body.is_empty()
        && ticker.len() <= 10
        && body.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    valid.then_some(ticker)
}

#[cfg(test)]
mod tests {
    use super::{normalize_ticker, round_to};

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(71.04, 1), 71.0);
        assert_eq!(round_to(12.345_67, 2), 12.35);
        assert_eq!(round_to(-0.123_45, 3), -0.123);
    }

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker(" aapl "), Some("AAPL".to_string()));
        assert_eq!(normalize_ticker("brk.b"), Some("BRK.B".to_string()));
        assert_eq!(normalize_ticker("^gspc"), Some("^GSPC".to_string()));
        assert_eq!(normalize_ticker(""), None);
        assert_eq!(normalize_ticker("^"), None);
        assert_eq!(normalize_ticker("AA PL"), None);
        assert_eq!(normalize_ticker("../etc"), None);
        assert_eq!(normalize_ticker("ABCDEFGHIJK"), None);
    }
}
