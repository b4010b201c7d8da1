//! Classification and validation of a single multisend sub-transaction.

use super::validation::{all_passed, Diagnostics, ValidationError};
use super::{
    AddressRegistry, ClassifiedTransfer, ReconciliationPolicy, SubTransactionKind,
    NATIVE_DECIMALS,
};
use crate::domain::{
    Address, Amount, ExpectedPayout, SubTransaction, TokenId, Transfer, TransferKind,
};

const WITHDRAW_METHOD: &str = "withdraw";
const TRANSFER_METHOD: &str = "transfer";
const NO_METHOD: &str = "<none>";

/// Decide the kind of a sub-transaction. First matching rule wins:
/// no call data, then a call to the wrapped-native token, then anything else.
pub fn classify(sub: &SubTransaction, wrapped_native: &Address) -> SubTransactionKind {
    if sub.data.is_none() {
        SubTransactionKind::NativeTransfer
    } else if sub.to == *wrapped_native {
        SubTransactionKind::WrappedUnwrap
    } else {
        SubTransactionKind::TokenTransfer
    }
}

/// Applies the per-kind rules and extracts the transfer record.
pub struct Classifier<'a> {
    registry: &'a AddressRegistry,
    policy: &'a ReconciliationPolicy,
}

impl<'a> Classifier<'a> {
    pub fn new(registry: &'a AddressRegistry, policy: &'a ReconciliationPolicy) -> Self {
        Self { registry, policy }
    }

    /// Process the sub-transaction at 1-based `position`.
    ///
    /// Structural failures return a `ValidationError`; policy and payout mismatches
    /// are only recorded in `diagnostics`.
    pub fn process(
        &self,
        sub: &SubTransaction,
        position: usize,
        expected: Option<&ExpectedPayout>,
        diagnostics: &mut Diagnostics,
    ) -> Result<ClassifiedTransfer, ValidationError> {
        let label = format!("Tx at index {}", position);
        let kind = classify(sub, &self.policy.wrapped_native);

        let classified = match kind {
            SubTransactionKind::NativeTransfer => {
                self.native_transfer(sub, position, &label, diagnostics)?
            }
            SubTransactionKind::WrappedUnwrap => {
                self.wrapped_unwrap(sub, position, &label, diagnostics)?
            }
            SubTransactionKind::TokenTransfer => {
                self.token_transfer(sub, position, &label, expected, diagnostics)?
            }
        };

        diagnostics.check_eq(
            &sub.operation,
            &0u8,
            format!("{} is a delegatecall", label),
        );

        if let (Some(transfer), Some(expected)) = (&classified.transfer, expected) {
            self.reconcile_payout(transfer, expected, &label, diagnostics);
        }

        Ok(classified)
    }

    fn native_transfer(
        &self,
        sub: &SubTransaction,
        position: usize,
        label: &str,
        d: &mut Diagnostics,
    ) -> Result<ClassifiedTransfer, ValidationError> {
        let structural = [d.check(
            sub.data.is_none(),
            format!("{} should have no data as it sends native tokens", label),
        )];
        if !all_passed(&structural) {
            return Err(ValidationError::EthTransfer { position });
        }

        let name = self.registry.display_name(&sub.to);
        d.check(
            self.registry.is_solver(&sub.to),
            format!(
                "{} sends ETH to address {} that is not in the solver list",
                label, name
            ),
        );

        Ok(ClassifiedTransfer {
            kind: SubTransactionKind::NativeTransfer,
            transfer: Some(Transfer::new(sub.to, sub.value, TokenId::Native, name)),
            native_delta: sub.value,
            token_delta: Amount::zero(),
        })
    }

    fn wrapped_unwrap(
        &self,
        sub: &SubTransaction,
        position: usize,
        label: &str,
        d: &mut Diagnostics,
    ) -> Result<ClassifiedTransfer, ValidationError> {
        let method = sub.method().unwrap_or(NO_METHOD);
        let structural = [
            d.check_eq(
                method,
                WITHDRAW_METHOD,
                format!(
                    "{} is interacting with WETH but not unwrapping (call to {})",
                    label, method
                ),
            ),
            d.check_eq(
                &sub.value,
                &Amount::zero(),
                format!("{} also sends the native token in a WETH unwrap", label),
            ),
        ];
        if !all_passed(&structural) {
            return Err(ValidationError::WethUnwrap { position });
        }

        Ok(ClassifiedTransfer {
            kind: SubTransactionKind::WrappedUnwrap,
            transfer: None,
            native_delta: Amount::zero(),
            token_delta: Amount::zero(),
        })
    }

    fn token_transfer(
        &self,
        sub: &SubTransaction,
        position: usize,
        label: &str,
        expected: Option<&ExpectedPayout>,
        d: &mut Diagnostics,
    ) -> Result<ClassifiedTransfer, ValidationError> {
        let primary = TokenId::Erc20(self.policy.primary_token);
        let expected_token = expected.map(|p| p.token).unwrap_or(primary);
        let method = sub.method().unwrap_or(NO_METHOD);

        let structural = [
            d.check_eq(
                &expected_token,
                &primary,
                format!(
                    "{} is sending a token that isn't the primary token or the native token. \
                     Please check if the payout plan has been generated correctly",
                    label
                ),
            ),
            d.check_eq(
                &TokenId::Erc20(sub.to),
                &expected_token,
                format!("{} is not sending out the expected token", label),
            ),
            d.check_eq(
                &sub.value,
                &Amount::zero(),
                format!("{} also sends the native token in a token transfer", label),
            ),
            d.check_eq(
                method,
                TRANSFER_METHOD,
                format!("{} is not doing a token transfer", label),
            ),
            d.check_eq(
                &sub.parameter_count(),
                &2usize,
                format!(
                    "{} doesn't have the right amount of parameters for a transfer",
                    label
                ),
            ),
        ];
        if !all_passed(&structural) {
            return Err(ValidationError::Erc20Transfer { position });
        }

        let fail = || ValidationError::Erc20Transfer { position };
        let call = sub.data_decoded.as_ref().ok_or_else(fail)?;
        let [raw_receiver, raw_amount] = call.parameters.as_slice() else {
            return Err(fail());
        };

        let receiver = match Address::parse(raw_receiver) {
            Ok(receiver) => receiver,
            Err(e) => {
                d.check(false, format!("{} transfers to a malformed receiver: {}", label, e));
                return Err(fail());
            }
        };
        let amount = match Amount::from_base_units(raw_amount) {
            Ok(amount) => amount,
            Err(e) => {
                d.check(false, format!("{} transfers a malformed amount: {}", label, e));
                return Err(fail());
            }
        };

        let name = self.registry.resolve_display_name(raw_receiver);
        d.check(
            self.registry.is_reward_target(&receiver),
            format!(
                "{} sends {} to address {} that is not in the reward target list",
                label, sub.to, name
            ),
        );

        Ok(ClassifiedTransfer {
            kind: SubTransactionKind::TokenTransfer,
            transfer: Some(Transfer::new(receiver, amount, TokenId::Erc20(sub.to), name)),
            native_delta: Amount::zero(),
            token_delta: amount,
        })
    }

    fn reconcile_payout(
        &self,
        transfer: &Transfer,
        expected: &ExpectedPayout,
        label: &str,
        d: &mut Diagnostics,
    ) {
        let (actual_kind, decimals) = match transfer.token {
            TokenId::Native => (TransferKind::Native, NATIVE_DECIMALS),
            TokenId::Erc20(_) => (TransferKind::Erc20, self.policy.token_decimals),
        };
        d.check_eq(
            &actual_kind,
            &expected.kind(),
            format!("{} does not match the transfer kind of the payout plan", label),
        );

        if let Some(expected_receiver) = expected.receiver {
            d.check_eq(
                &self.registry.display_name(&transfer.receiver),
                &self.registry.display_name(&expected_receiver),
                format!("{} pays a different receiver than the payout plan", label),
            );
        }

        let Some(expected_amount) = expected.amount.as_deref() else {
            return;
        };
        match Amount::from_human_units(expected_amount, decimals) {
            Ok(expected_base) => {
                let difference = transfer.amount.abs_diff(expected_base);
                d.check(
                    difference < self.policy.payout_tolerance,
                    format!(
                        "{} sends {} but the payout plan expects {} (off by {} base units)",
                        label,
                        transfer.amount.to_human_units(decimals),
                        expected_amount,
                        difference
                    ),
                );
            }
            Err(e) => {
                d.check(
                    false,
                    format!("{} has an unreadable expected amount: {}", label, e),
                );
            }
        }
    }
}
