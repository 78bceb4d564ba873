//! Synchronous transfer form validation.
//!
//! Both fields are always checked; each field stops at its first failure.
//! Amount checks run in order: present, positive, within balance, within the
//! network cap.

use std::collections::BTreeMap;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::config::{NetworkDescriptor, TransferConfig};
use crate::transfer::amount::{format_amount, parse_amount, whole_units, AmountError};

pub const RECIPIENT_REQUIRED: &str = "Recipient address is required";
pub const INVALID_ADDRESS: &str = "Invalid address format";
pub const AMOUNT_REQUIRED: &str = "Amount is required";
pub const AMOUNT_NOT_POSITIVE: &str = "Amount must be a positive number";

/// Form field a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Recipient,
    Amount,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Recipient => "recipient",
            Field::Amount => "amount",
        }
    }
}

/// Field → message map. Empty means valid.
pub type FieldErrors = BTreeMap<Field, String>;

/// Per-network caps in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferLimits {
    pub testnet_max: U256,
    pub mainnet_max: U256,
    testnet_max_units: u64,
    mainnet_max_units: u64,
}

impl TransferLimits {
    pub fn new(testnet_max_units: u64, mainnet_max_units: u64) -> Self {
        Self {
            testnet_max: whole_units(testnet_max_units),
            mainnet_max: whole_units(mainnet_max_units),
            testnet_max_units,
            mainnet_max_units,
        }
    }

    pub fn from_config(config: &TransferConfig) -> Self {
        Self::new(config.testnet_max_amount, config.mainnet_max_amount)
    }

    fn check(&self, amount: U256, network: &NetworkDescriptor) -> Result<(), String> {
        let cap = if network.testnet { self.testnet_max } else { self.mainnet_max };
        if amount > cap {
            return Err(self.over_cap_message(network));
        }
        Ok(())
    }

    fn over_cap_message(&self, network: &NetworkDescriptor) -> String {
        let symbol = &network.native_currency.symbol;
        if network.testnet {
            format!("Maximum transfer on testnet is {} {}", self.testnet_max_units, symbol)
        } else {
            format!("Maximum transfer is {} {}", self.mainnet_max_units, symbol)
        }
    }
}

impl Default for TransferLimits {
    fn default() -> Self {
        Self::from_config(&TransferConfig::default())
    }
}

/// A form that passed validation, ready to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedTransfer {
    pub recipient: Address,
    pub value: U256,
}

/// Inputs the amount checks depend on.
pub struct ValidationContext<'a> {
    /// Balance of the sending account; `None` skips the balance check.
    pub balance: Option<U256>,
    pub network: &'a NetworkDescriptor,
    pub limits: &'a TransferLimits,
}

/// `0x` + 40 hex digits; mixed case must carry a valid EIP-55 checksum.
pub fn parse_recipient(input: &str) -> Option<Address> {
    let hex = input.strip_prefix("0x")?;
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    if hex.chars().any(|c| c.is_ascii_uppercase()) {
        Address::parse_checksummed(input, None).ok()
    } else {
        input.parse().ok()
    }
}

/// Validate a recipient/amount pair.
pub fn validate_transfer(
    recipient: &str,
    amount: &str,
    ctx: &ValidationContext<'_>,
) -> Result<ValidatedTransfer, FieldErrors> {
    let mut errors = FieldErrors::new();

    let to = if recipient.is_empty() {
        errors.insert(Field::Recipient, RECIPIENT_REQUIRED.to_string());
        None
    } else {
        let parsed = parse_recipient(recipient);
        if parsed.is_none() {
            errors.insert(Field::Recipient, INVALID_ADDRESS.to_string());
        }
        parsed
    };

    let value = match parse_amount(amount) {
        Err(AmountError::Empty) => {
            errors.insert(Field::Amount, AMOUNT_REQUIRED.to_string());
            None
        }
        Err(AmountError::NotPositive) => {
            errors.insert(Field::Amount, AMOUNT_NOT_POSITIVE.to_string());
            None
        }
        // Larger than any balance or cap.
        Err(AmountError::TooLarge) => {
            let message = match ctx.balance {
                Some(balance) => insufficient_balance(balance, ctx),
                None => ctx.limits.over_cap_message(ctx.network),
            };
            errors.insert(Field::Amount, message);
            None
        }
        Ok(wei) => match check_amount(wei, ctx) {
            Ok(()) => Some(wei),
            Err(message) => {
                errors.insert(Field::Amount, message);
                None
            }
        },
    };

    match (to, value) {
        (Some(recipient), Some(value)) if errors.is_empty() => Ok(ValidatedTransfer { recipient, value }),
        _ => Err(errors),
    }
}

fn check_amount(wei: U256, ctx: &ValidationContext<'_>) -> Result<(), String> {
    if let Some(balance) = ctx.balance {
        if wei > balance {
            return Err(insufficient_balance(balance, ctx));
        }
    }
    ctx.limits.check(wei, ctx.network)
}

fn insufficient_balance(balance: U256, ctx: &ValidationContext<'_>) -> String {
    format!(
        "Insufficient balance. You have {} {}",
        format_amount(balance),
        ctx.network.native_currency.symbol
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPIENT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    fn testnet() -> NetworkDescriptor {
        NetworkDescriptor::xrpl_evm_testnet()
    }

    fn mainnet() -> NetworkDescriptor {
        NetworkDescriptor::xrpl_evm_mainnet()
    }

    fn validate(recipient: &str, amount: &str, balance: Option<u64>, network: &NetworkDescriptor) -> Result<ValidatedTransfer, FieldErrors> {
        let limits = TransferLimits::default();
        let ctx = ValidationContext {
            balance: balance.map(whole_units),
            network,
            limits: &limits,
        };
        validate_transfer(recipient, amount, &ctx)
    }

    #[test]
    fn test_valid_transfer() {
        let ok = validate(RECIPIENT, "1.5", Some(10), &testnet()).unwrap();
        assert_eq!(ok.recipient, RECIPIENT.parse::<Address>().unwrap());
        assert_eq!(ok.value, parse_amount("1.5").unwrap());
    }

    #[test]
    fn test_required_fields() {
        let errors = validate("", "", None, &testnet()).unwrap_err();
        assert_eq!(errors[&Field::Recipient], RECIPIENT_REQUIRED);
        assert_eq!(errors[&Field::Amount], AMOUNT_REQUIRED);
    }

    #[test]
    fn test_malformed_recipients() {
        let bad = [
            "0x123",
            "70997970C51812dc3A010C7d01b50e0d17dc79C8",
            "0x70997970C51812dc3A010C7d01b50e0d17dc79CZ",
            "0x70997970c51812dc3a010c7d01b50e0d17dc79c8ff",
            // checksum broken by flipping one letter's case
            "0x70997970c51812dc3A010C7d01b50e0d17dc79C8",
            "0X70997970C51812dc3A010C7d01b50e0d17dc79C8",
            " 0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
        ];
        for recipient in bad {
            let errors = validate(recipient, "1", None, &testnet()).unwrap_err();
            assert_eq!(errors[&Field::Recipient], INVALID_ADDRESS, "{recipient}");
            assert!(!errors.contains_key(&Field::Amount));
        }
    }

    #[test]
    fn test_lowercase_recipient_accepted() {
        assert!(validate(&RECIPIENT.to_lowercase(), "1", None, &testnet()).is_ok());
    }

    #[test]
    fn test_non_positive_amounts() {
        for amount in ["0", "-1", "abc", "0.0"] {
            let errors = validate(RECIPIENT, amount, None, &testnet()).unwrap_err();
            assert_eq!(errors[&Field::Amount], AMOUNT_NOT_POSITIVE, "{amount}");
        }
    }

    #[test]
    fn test_amount_over_balance() {
        let errors = validate(RECIPIENT, "5.0001", Some(5), &testnet()).unwrap_err();
        let message = &errors[&Field::Amount];
        assert!(message.contains("5.0"), "{message}");
        assert_eq!(message, "Insufficient balance. You have 5.0 XRP");

        assert!(validate(RECIPIENT, "5", Some(5), &testnet()).is_ok());
    }

    #[test]
    fn test_network_caps() {
        let errors = validate(RECIPIENT, "1500", None, &testnet()).unwrap_err();
        assert_eq!(errors[&Field::Amount], "Maximum transfer on testnet is 1000 XRP");

        assert!(validate(RECIPIENT, "1500", None, &mainnet()).is_ok());
        assert!(validate(RECIPIENT, "10000", None, &mainnet()).is_ok());

        let errors = validate(RECIPIENT, "10000.5", None, &mainnet()).unwrap_err();
        assert_eq!(errors[&Field::Amount], "Maximum transfer is 10000 XRP");
    }

    #[test]
    fn test_malformed_amounts() {
        for amount in ["1_000", "5.0000000000000000001", "1e3", "+2"] {
            let errors = validate(RECIPIENT, amount, Some(10_000), &mainnet()).unwrap_err();
            assert_eq!(errors[&Field::Amount], AMOUNT_NOT_POSITIVE, "{amount}");
        }
    }

    #[test]
    fn test_overflowing_amount_reports_limits() {
        let huge = "9".repeat(80);

        let errors = validate(RECIPIENT, &huge, Some(5), &testnet()).unwrap_err();
        assert_eq!(errors[&Field::Amount], "Insufficient balance. You have 5.0 XRP");

        let errors = validate(RECIPIENT, &huge, None, &mainnet()).unwrap_err();
        assert_eq!(errors[&Field::Amount], "Maximum transfer is 10000 XRP");
    }

    #[test]
    fn test_balance_checked_before_cap() {
        let errors = validate(RECIPIENT, "1500", Some(2), &testnet()).unwrap_err();
        assert!(errors[&Field::Amount].starts_with("Insufficient balance"));
    }
}
