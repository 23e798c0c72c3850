pub mod event;
pub mod expense;
pub mod income;
pub mod schema;
pub mod summary;
pub mod validate;

use crate::core::{Money, SignedMoney};

/// Format an amount for display. Pounds get the currency symbol, anything
/// else keeps its code as a prefix.
pub fn format_money(money: &Money) -> String {
    if money.currency() == "GBP" {
        format!("\u{00A3}{:.2}", money.amount())
    } else {
        format!("{} {:.2}", money.currency(), money.amount())
    }
}

pub fn format_money_signed(money: &SignedMoney) -> String {
    let amount = money.amount();
    if money.currency() == "GBP" {
        if money.is_negative() {
            format!("-\u{00A3}{:.2}", amount.abs())
        } else {
            format!("\u{00A3}{:.2}", amount)
        }
    } else {
        format!("{} {:.2}", money.currency(), amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_pounds_with_symbol() {
        let money = Money::gbp(dec!(1234.50)).unwrap();
        assert_eq!(format_money(&money), "\u{00A3}1234.50");
    }

    #[test]
    fn formats_other_currencies_with_code() {
        let money = Money::new(dec!(99.00), "EUR").unwrap();
        assert_eq!(format_money(&money), "EUR 99.00");
    }

    #[test]
    fn signed_format_puts_the_minus_before_the_symbol() {
        let loss = SignedMoney::new(dec!(-500.00), "GBP").unwrap();
        assert_eq!(format_money_signed(&loss), "-\u{00A3}500.00");
        let gain = SignedMoney::new(dec!(225.25), "GBP").unwrap();
        assert_eq!(format_money_signed(&gain), "\u{00A3}225.25");
    }
}
