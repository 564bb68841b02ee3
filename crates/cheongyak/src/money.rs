//! Korean currency and floor-area display helpers.

/// Won per 만원.
pub const WON_PER_MANWON: u64 = 10_000;
const WON_PER_EOK: u64 = 100_000_000;

/// Formats an amount in 원 the way listing cards show it: `1억 5000만원`,
/// `392.8만원`, `9000원`.
///
/// Fractional 만 are shown with one decimal place; a 억 remainder below
/// 1만원 is dropped.
pub fn format_korean_money(won: u64) -> String {
    if won == 0 {
        return "0원".to_string();
    }

    let eok = won / WON_PER_EOK;
    let man = (won % WON_PER_EOK) as f64 / WON_PER_MANWON as f64;

    if eok > 0 {
        if man >= 1.0 {
            return format!("{eok}억 {}만원", format_man(man));
        }
        return format!("{eok}억");
    }

    if man >= 1.0 {
        return format!("{}만원", format_man(man));
    }

    format!("{won}원")
}

fn format_man(man: f64) -> String {
    if man.fract() == 0.0 {
        format!("{man:.0}")
    } else {
        format!("{man:.1}")
    }
}

/// Converts 만원 (as contract bands carry them) into 원.
pub fn manwon_to_won(manwon: f64) -> u64 {
    if !manwon.is_finite() || manwon <= 0.0 {
        return 0;
    }
    (manwon * WON_PER_MANWON as f64).round() as u64
}

pub fn format_manwon(manwon: f64) -> String {
    format_korean_money(manwon_to_won(manwon))
}

/// For the 원 amounts the units API sends as JSON numbers.
pub fn format_won(won: f64) -> String {
    if !won.is_finite() || won <= 0.0 {
        return format_korean_money(0);
    }
    format_korean_money(won.round() as u64)
}

/// `15.24` → `15.2평`.
pub fn format_pyeong(pyeong: f64) -> String {
    format!("{pyeong:.1}평")
}

/// Lenient variant for the string-typed areas the units API returns.
pub fn format_pyeong_str(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => format_pyeong(value),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_eok_with_man_remainder() {
        assert_eq!(format_korean_money(150_000_000), "1억 5000만원");
        assert_eq!(format_korean_money(200_000_000), "2억");
        assert_eq!(format_korean_money(100_005_000), "1억");
        assert_eq!(format_korean_money(100_010_000), "1억 1만원");
    }

    #[test]
    fn formats_man_with_single_decimal() {
        assert_eq!(format_korean_money(3_928_000), "392.8만원");
        assert_eq!(format_korean_money(250_000), "25만원");
        assert_eq!(format_korean_money(9_000), "9000원");
        assert_eq!(format_korean_money(0), "0원");
    }

    #[test]
    fn manwon_amounts_round_to_won() {
        assert_eq!(manwon_to_won(392.8), 3_928_000);
        assert_eq!(manwon_to_won(-1.0), 0);
        assert_eq!(format_manwon(25.0), "25만원");
    }

    #[test]
    fn api_won_amounts_format_like_cards() {
        assert_eq!(format_won(25_000_000.0), "2500만원");
        assert_eq!(format_won(f64::NAN), "0원");
    }

    #[test]
    fn pyeong_keeps_one_decimal() {
        assert_eq!(format_pyeong(15.24), "15.2평");
        assert_eq!(format_pyeong_str("6.47"), "6.5평");
        assert_eq!(format_pyeong_str("n/a"), "n/a");
    }
}
