use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount must not be negative: {0}")]
    NegativeAmount(Decimal),
    #[error("currency must not be blank")]
    BlankCurrency,
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },
    #[error("resulting amount must not be negative: {left} - {right}")]
    NegativeResult { left: Decimal, right: Decimal },
}

/// Non-negative monetary value with a fixed two decimal place scale.
///
/// Construction and every arithmetic result round to two decimal places,
/// ties toward zero. Negative amounts are rejected as given, before any
/// rounding. Arithmetic requires both operands to share a currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "MoneyParts", into = "MoneyParts")]
pub struct Money {
    #[schemars(with = "String")]
    amount: Decimal,
    currency: String,
}

/// Wire form of [`Money`]; deserialization funnels through `Money::new`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MoneyParts {
    amount: Decimal,
    currency: String,
}

impl TryFrom<MoneyParts> for Money {
    type Error = MoneyError;

    fn try_from(parts: MoneyParts) -> Result<Self, Self::Error> {
        Money::new(parts.amount, &parts.currency)
    }
}

impl From<Money> for MoneyParts {
    fn from(money: Money) -> Self {
        MoneyParts {
            amount: money.amount,
            currency: money.currency,
        }
    }
}

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Result<Money, MoneyError> {
        let currency = normalize_currency(currency);
        if currency.is_empty() {
            return Err(MoneyError::BlankCurrency);
        }
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::NegativeAmount(amount));
        }
        Ok(Money {
            amount: scale2(amount),
            currency,
        })
    }

    pub fn gbp(amount: Decimal) -> Result<Money, MoneyError> {
        Money::new(amount, "GBP")
    }

    /// Zero pounds, the identity for income/expense folds.
    pub fn zero() -> Money {
        Money {
            amount: dec!(0.00),
            currency: "GBP".to_string(),
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.require_same_currency(other)?;
        Money::new(self.amount + other.amount, &self.currency)
    }

    pub fn subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        self.require_same_currency(other)?;
        let result = self.amount - other.amount;
        if result.is_sign_negative() && !result.is_zero() {
            return Err(MoneyError::NegativeResult {
                left: self.amount,
                right: other.amount,
            });
        }
        Money::new(result, &self.currency)
    }

    pub fn multiply(&self, factor: Decimal) -> Result<Money, MoneyError> {
        Money::new(self.amount * factor, &self.currency)
    }

    pub fn is_less_than(&self, other: &Money) -> Result<bool, MoneyError> {
        self.require_same_currency(other)?;
        Ok(self.amount < other.amount)
    }

    pub fn is_greater_than(&self, other: &Money) -> Result<bool, MoneyError> {
        self.require_same_currency(other)?;
        Ok(self.amount > other.amount)
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Widen into the signed representation used for profit.
    pub fn to_signed(&self) -> SignedMoney {
        SignedMoney {
            amount: self.amount,
            currency: self.currency.clone(),
        }
    }

    fn require_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            });
        }
        Ok(())
    }
}

/// Monetary value that may be negative. Only profit produces one; the
/// non-negative invariant on [`Money`] stays intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct SignedMoney {
    #[schemars(with = "String")]
    amount: Decimal,
    currency: String,
}

impl SignedMoney {
    pub fn new(amount: Decimal, currency: &str) -> Result<SignedMoney, MoneyError> {
        let currency = normalize_currency(currency);
        if currency.is_empty() {
            return Err(MoneyError::BlankCurrency);
        }
        Ok(SignedMoney {
            amount: scale2(amount),
            currency,
        })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

/// Two decimal places, ties toward zero, zero-padded to scale 2.
fn scale2(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointTowardZero);
    rounded.rescale(2);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

fn normalize_currency(currency: &str) -> String {
    currency.trim().to_uppercase()
}
