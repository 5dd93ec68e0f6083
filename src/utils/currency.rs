//! Amount formatting for microAlgos and asset base units
//!
//! Amounts are integers on the wire. Formatting inserts a decimal point at a
//! fixed position using integer arithmetic only, so no value is ever rounded.

/// Decimal places of the native currency (1 Algo = 1_000_000 microAlgos)
pub const ALGO_DECIMALS: u8 = 6;

/// Insert a decimal point `decimals` digits from the right
///
/// # Examples
/// ```
/// use algo_tx_review::utils::currency::format_amount;
///
/// assert_eq!(format_amount(500000, 6), "0.500000");
/// assert_eq!(format_amount(12345678, 6), "12.345678");
/// assert_eq!(format_amount(42, 0), "42");
/// ```
pub fn format_amount(base_units: u64, decimals: u8) -> String {
    let digits = base_units.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits;
    }
    if digits.len() <= decimals {
        format!("0.{}{}", "0".repeat(decimals - digits.len()), digits)
    } else {
        let (whole, fraction) = digits.split_at(digits.len() - decimals);
        format!("{}.{}", whole, fraction)
    }
}

/// Format a microAlgo amount
///
/// # Examples
/// ```
/// use algo_tx_review::utils::currency::format_microalgos;
///
/// assert_eq!(format_microalgos(1000), "0.001000");
/// ```
pub fn format_microalgos(micro_algos: u64) -> String {
    format_amount(micro_algos, ALGO_DECIMALS)
}
