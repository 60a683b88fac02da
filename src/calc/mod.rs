/// Result of splitting a sale among party members after the market fee.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LootSplit {
    pub fee: u64,
    pub net: u64,
    pub per_member: u64,
    /// Left over after even division; usually kept by the seller.
    pub remainder: u64,
}

/// `fee_percent` must be within 0..=100 and `members` non-zero.
/// The fee is rounded down.
pub(crate) fn split_loot(total: u64, members: u32, fee_percent: f64) -> Option<LootSplit> {
    if members == 0 || !(0.0..=100.0).contains(&fee_percent) {
        return None;
    }

    // Basis points keep e.g. 2.5% exact in integer math.
    let fee_bp = (fee_percent * 100.0).round() as u128;
    let fee = (u128::from(total) * fee_bp / 10_000) as u64;
    let net = total - fee;
    let members = u64::from(members);

    Some(LootSplit {
        fee,
        net,
        per_member: net / members,
        remainder: net % members,
    })
}

/// Parses user input like `1,250,000` or ` 3000 `.
pub(crate) fn parse_amount(input: &str) -> Option<u64> {
    let digits: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// `1234567` -> `1,234,567`.
pub(crate) fn format_amount(value: u64) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_with_ten_percent_fee() {
        assert_eq!(
            split_loot(1000, 3, 10.0),
            Some(LootSplit {
                fee: 100,
                net: 900,
                per_member: 300,
                remainder: 0,
            })
        );
    }

    #[test]
    fn test_split_keeps_remainder_and_fractional_fee() {
        let s = split_loot(10_001, 4, 2.5).expect("valid split");
        assert_eq!(s.fee, 250);
        assert_eq!(s.net, 9_751);
        assert_eq!(s.per_member, 2_437);
        assert_eq!(s.remainder, 3);
    }

    #[test]
    fn test_split_rejects_bad_input() {
        assert!(split_loot(1000, 0, 5.0).is_none());
        assert!(split_loot(1000, 2, -1.0).is_none());
        assert!(split_loot(1000, 2, 100.5).is_none());
        assert!(split_loot(1000, 2, f64::NAN).is_none());
    }

    #[test]
    fn test_full_fee_leaves_nothing() {
        let s = split_loot(u64::MAX, 1, 100.0).expect("valid split");
        assert_eq!(s.net, 0);
        assert_eq!(s.per_member, 0);
    }

    #[test]
    fn test_parse_and_format_amount() {
        assert_eq!(parse_amount(" 1,250,000 "), Some(1_250_000));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("12a"), None);
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1_234_567), "1,234,567");
    }
}
