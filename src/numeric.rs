// src/numeric.rs
// Raw on-chain integer -> f64 conversions shared by the pricing and
// supply readers.

use ethers::types::U256;

/// Lossy scientific conversion of a U256 to f64 without intermediate u128
/// casts. Takes the leading digits as mantissa and the remaining digit count
/// as a base-10 exponent, so values far beyond u128::MAX stay finite.
pub fn u256_to_f64_lossy(v: U256) -> f64 {
    if v.is_zero() {
        return 0.0;
    }
    let s = v.to_string();
    let len = s.len();
    let take = if len >= 18 { 18 } else { len };
    let (mantissa_str, _rest) = s.split_at(take);
    let mantissa = mantissa_str.parse::<f64>().unwrap_or(0.0);
    let exp10 = (len - take) as i32;
    mantissa * 10f64.powi(exp10)
}

/// Divide a raw token amount by 10^decimals via exact decimal-string
/// placement instead of f64 powers. 18-decimals supplies lose precision when
/// scaled with `powi`; shifting the decimal point in the digit string does
/// not.
pub fn u256_div_10_pow(value: U256, decimals: u32) -> f64 {
    if value.is_zero() {
        return 0.0;
    }
    let s = value.to_string();
    let len = s.len();
    let d = decimals as usize;
    let dec_str = if d == 0 {
        s
    } else if len <= d {
        let mut out = String::with_capacity(2 + d);
        out.push_str("0.");
        if d > len {
            out.push_str(&"0".repeat(d - len));
        }
        out.push_str(&s);
        out
    } else {
        let int_part = &s[..len - d];
        let frac_part = &s[len - d..];
        format!("{}.{}", int_part, frac_part)
    };
    dec_str.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_div_10_pow_basic() {
        assert_eq!(u256_div_10_pow(U256::from(123456789u64), 8), 1.23456789);
        assert_eq!(u256_div_10_pow(U256::from(1_000_000u64), 6), 1.0);
        assert_eq!(u256_div_10_pow(U256::zero(), 18), 0.0);
    }

    #[test]
    fn test_div_10_pow_leading_zeros() {
        // Fewer digits than decimals: 42 / 10^6 = 0.000042
        assert_eq!(u256_div_10_pow(U256::from(42u64), 6), 0.000042);
        // No decimals at all
        assert_eq!(u256_div_10_pow(U256::from(42u64), 0), 42.0);
    }

    #[test]
    fn test_div_10_pow_18_decimals() {
        // One whole token with 18 decimals
        assert_eq!(u256_div_10_pow(U256::exp10(18), 18), 1.0);
        // 1.5 tokens
        let raw = U256::exp10(18) + U256::exp10(17) * U256::from(5);
        assert_eq!(u256_div_10_pow(raw, 18), 1.5);
    }

    #[test]
    fn test_lossy_conversion() {
        assert_eq!(u256_to_f64_lossy(U256::zero()), 0.0);
        assert_eq!(u256_to_f64_lossy(U256::from(1000u64)), 1000.0);
        // 10^30 survives the conversion even though it overflows u64/u128 math
        let big = U256::exp10(30);
        let approx = u256_to_f64_lossy(big);
        assert!((approx - 1e30).abs() / 1e30 < 1e-12);
    }
}
