//! Wei amounts rendered as whole tokens.
use alloy_primitives::U256;

/// 10^18 wei.
pub const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

/// 10^16 wei, one hundredth of a token.
const WEI_PER_CENT: U256 = U256::from_limbs([10_000_000_000_000_000, 0, 0, 0]);

/// Formats `wei / 10^18` with two decimals, rounding half up.
pub fn format_tokens(wei: U256) -> String {
    let (cents, rest) = wei.div_rem(WEI_PER_CENT);
    let half = WEI_PER_CENT / U256::from(2);
    let cents = if rest >= half {
        cents.saturating_add(U256::from(1))
    } else {
        cents
    };
    let (whole, frac) = cents.div_rem(U256::from(100));
    format!("{whole}.{:02}", frac.to::<u64>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0.00")]
    #[case(ONE_ETHER, "1.00")]
    #[case(100 * ONE_ETHER, "100.00")]
    #[case(50 * ONE_ETHER / 3, "16.67")]
    #[case(ONE_ETHER / 200, "0.01")]
    #[case(ONE_ETHER / 200 - 1, "0.00")]
    #[case(1_234_500_000_000_000_000, "1.23")]
    fn formats(#[case] wei: u128, #[case] expected: &str) {
        assert_eq!(format_tokens(U256::from(wei)), expected);
    }

    #[test]
    fn formats_values_beyond_u128() {
        let wei = U256::from(ONE_ETHER) * U256::from(u128::MAX);
        assert_eq!(format_tokens(wei), format!("{}.00", u128::MAX));
    }
}
