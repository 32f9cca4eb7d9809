// src/math.rs
//! Fixed-point amount arithmetic.
//!
//! On-chain amounts are integer base units. Quantities that reach the
//! wallet (minimum amount out) are computed on the raw integers with
//! arbitrary precision and a single final floor division; `Decimal`
//! values are only used for the normalized view reported to callers.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use rust_decimal::Decimal;

use crate::shared::errors::SwapError;

/// Largest decimal exponent a `Decimal` can carry as scale
pub const MAX_DECIMALS: u32 = 28;

/// Largest mantissa a `Decimal` can hold (2^96 - 1)
const MAX_MANTISSA: u128 = (1u128 << 96) - 1;

fn overflow(what: &str) -> SwapError {
    SwapError::InvalidAmount(format!("{} overflows decimal range", what))
}

/// Base units -> token units (`raw / 10^decimals`).
///
/// Exact while `raw` fits the 96-bit `Decimal` mantissa. Larger values drop
/// their lowest digits (truncation) until they fit; only a token amount whose
/// integer part exceeds `Decimal::MAX` is an error.
pub fn normalize(raw: u128, decimals: u32) -> Result<Decimal, SwapError> {
    if decimals > MAX_DECIMALS {
        return Err(SwapError::InvalidAmount(format!("unsupported decimals: {}", decimals)));
    }
    let mut mantissa = raw;
    let mut scale = decimals;
    while mantissa > MAX_MANTISSA {
        if scale == 0 {
            return Err(overflow("amount"));
        }
        mantissa /= 10;
        scale -= 1;
    }
    Decimal::try_from_i128_with_scale(mantissa as i128, scale).map_err(|_| overflow("amount"))
}

/// `floor(numerator / denominator)` as a nat
fn floor_div(numerator: BigUint, denominator: BigUint) -> Result<u128, SwapError> {
    if denominator.is_zero() {
        return Err(SwapError::InvalidAmount("division by zero".to_string()));
    }
    let quotient = numerator / denominator;
    quotient
        .to_u128()
        .ok_or_else(|| SwapError::InvalidAmount(format!("amount does not fit a nat: {}", quotient)))
}

/// Spot price of `out` in units of `in` for a constant-product pool
pub fn spot_price(token_in_supply: Decimal, token_out_supply: Decimal) -> Option<Decimal> {
    if token_in_supply.is_zero() {
        return None;
    }
    token_out_supply.checked_div(token_in_supply)
}

pub fn validate_slippage(slippage: Decimal) -> Result<(), SwapError> {
    if slippage < Decimal::ZERO || slippage >= Decimal::ONE {
        return Err(SwapError::InvalidAmount(format!(
            "slippage must be in [0, 1), got {}",
            slippage
        )));
    }
    Ok(())
}

/// Minimum amount out, in base units of the output token.
///
/// With `price = (reserve_out / 10^dec_out) / (reserve_in / 10^dec_in)` the
/// flat-slippage quote `amount_in / 10^dec_in * price * 10^dec_out * (1 - slippage)`
/// reduces to `amount_in * reserve_out * (1 - slippage) / reserve_in` in base
/// units, so decimals cancel and the only rounding is the final floor.
/// This is the spot price, not the constant-product execution price.
pub fn calculate_min_out(
    amount_in: u128,
    reserve_in: u128,
    reserve_out: u128,
    slippage: Decimal,
) -> Result<u128, SwapError> {
    validate_slippage(slippage)?;
    if reserve_in == 0 {
        return Err(SwapError::InvalidAmount("empty input reserve".to_string()));
    }

    // (1 - slippage) as keep_mantissa / 10^keep_scale
    let keep = Decimal::ONE - slippage;
    let keep_mantissa = u128::try_from(keep.mantissa())
        .map_err(|_| SwapError::InvalidAmount(format!("slippage out of range: {}", slippage)))?;

    let numerator = BigUint::from(amount_in) * BigUint::from(reserve_out) * BigUint::from(keep_mantissa);
    let denominator = BigUint::from(reserve_in) * BigUint::from(10u32).pow(keep.scale());
    floor_div(numerator, denominator)
}
