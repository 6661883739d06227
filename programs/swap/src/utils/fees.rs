use anchor_lang::prelude::*;
use crate::constants::BPS_DENOMINATOR;
use crate::errors::SwapError;

/// Output-asset payment owed for `input_amount` at the rate fixed by the offer:
/// `floor(input_amount * expected_total_amount / initial_amount)`.
/// The product is taken in u128 so it cannot overflow before the division.
pub fn calculate_payment(
    input_amount: u64,
    expected_total_amount: u64,
    initial_amount: u64,
) -> Result<u64> {
    let payment = (input_amount as u128)
        .checked_mul(expected_total_amount as u128)
        .ok_or(SwapError::CalculationError)?
        .checked_div(initial_amount as u128)
        .ok_or(SwapError::CalculationError)?;

    u64::try_from(payment).map_err(|_| error!(SwapError::CalculationError))
}

/// Splits `total` into `(fee, net)` at `fee_bps` basis points, fee rounded down.
pub fn calculate_fee(total: u64, fee_bps: u64) -> Result<(u64, u64)> {
    let fee = (total as u128)
        .checked_mul(fee_bps as u128)
        .ok_or(SwapError::CalculationError)?
        .checked_div(BPS_DENOMINATOR as u128)
        .ok_or(SwapError::CalculationError)?;
    let fee = u64::try_from(fee).map_err(|_| error!(SwapError::CalculationError))?;

    let net = total
        .checked_sub(fee)
        .ok_or(SwapError::CalculationError)?;

    Ok((fee, net))
}
