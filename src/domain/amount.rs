//! Token amount conversion between human decimals and integer base units.
//!
//! USDC carries 6 decimals on Scroll, but decimals are always read from the
//! token contract rather than assumed. Conversions use `rust_decimal` so no
//! precision is lost on the way to base units — an amount that cannot be
//! represented exactly is rejected instead of rounded.

use alloy::primitives::U256;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::DepositError;

/// Minimum deposit in whole token units.
pub const MIN_DEPOSIT: Decimal = dec!(0.00001);

/// Validate the minimum-amount rule without touching the network.
///
/// Called before any RPC so an obviously bad request never costs a call.
pub fn ensure_minimum(amount: Decimal) -> Result<(), DepositError> {
    if amount < MIN_DEPOSIT {
        return Err(DepositError::InvalidAmount(format!(
            "{amount} is below the minimum of {MIN_DEPOSIT}"
        )));
    }
    Ok(())
}

/// Scale a decimal token amount to integer base units.
///
/// Fails with `InvalidAmount` when the amount has more fractional digits
/// than the token supports (rounding loss) or is not positive.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<U256, DepositError> {
    if amount <= Decimal::ZERO {
        return Err(DepositError::InvalidAmount(format!(
            "{amount} is not positive"
        )));
    }

    let normalized = amount.normalize();
    let scale = normalized.scale();
    if scale > u32::from(decimals) {
        return Err(DepositError::InvalidAmount(format!(
            "{amount} has {scale} fractional digits but the token supports {decimals}"
        )));
    }

    // mantissa is positive after the checks above
    let mantissa = normalized.mantissa().unsigned_abs();
    let factor = 10u128.pow(u32::from(decimals) - scale);
    let units = mantissa
        .checked_mul(factor)
        .ok_or_else(|| DepositError::InvalidAmount(format!("{amount} overflows base units")))?;

    Ok(U256::from(units))
}

/// Render base units back into whole token units for reporting.
///
/// Returns `None` for balances too large to fit a 128-bit mantissa; those
/// cannot occur for real token supplies and are only reachable in tests.
pub fn from_base_units(units: U256, decimals: u8) -> Option<Decimal> {
    let raw: u128 = units.try_into().ok()?;
    let mantissa = i128::try_from(raw).ok()?;
    Decimal::try_from_i128_with_scale(mantissa, u32::from(decimals))
        .ok()
        .map(|d| d.normalize())
}
