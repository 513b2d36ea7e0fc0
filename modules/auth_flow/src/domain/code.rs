use rand::Rng;

/// Generate a verification code of exactly `length` digits, uniformly
/// random over the digit space (leading zeros included).
pub fn generate_otp_code(length: usize) -> String {
    let length = length.clamp(1, 9);
    let upper = 10u32.pow(length as u32);
    let mut rng = rand::rng();
    let code: u32 = rng.random_range(0..upper);
    format!("{code:0length$}")
}

/// Normalize user input before comparison: keep digits only and truncate to
/// the configured code length.
pub fn normalize_otp_input(input: &str, length: usize) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(length)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_has_exact_length_and_is_numeric() {
        for _ in 0..100 {
            let code = generate_otp_code(4);
            assert_eq!(code.len(), 4);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn longer_lengths_are_respected() {
        let code = generate_otp_code(6);
        assert_eq!(code.len(), 6);
    }

    #[test]
    fn codes_vary() {
        let codes: std::collections::HashSet<String> =
            (0..100).map(|_| generate_otp_code(4)).collect();
        // With 10k possible values, 100 draws should not collapse to one
        assert!(codes.len() > 50);
    }

    #[test]
    fn leading_zeros_are_possible() {
        let mut found = false;
        for _ in 0..5000 {
            if generate_otp_code(4).starts_with('0') {
                found = true;
                break;
            }
        }
        assert!(found, "codes starting with 0 must be generable");
    }

    #[test]
    fn normalization_strips_non_digits_and_truncates() {
        assert_eq!(normalize_otp_input("12AB", 4), "12");
        assert_eq!(normalize_otp_input(" 1 2 3 4 ", 4), "1234");
        assert_eq!(normalize_otp_input("123456", 4), "1234");
        assert_eq!(normalize_otp_input("abcd", 4), "");
        assert_eq!(normalize_otp_input("", 4), "");
    }
}
