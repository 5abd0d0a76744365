//! Property-Based Tests — Amount Conversion Invariants
//!
//! Uses `proptest` to verify that decimal-to-base-unit scaling never
//! loses precision across random inputs.

use alloy::primitives::U256;
use proptest::prelude::*;
use rust_decimal::Decimal;

use layerbank_deposit_bot::domain::amount::{
    ensure_minimum, from_base_units, to_base_units, MIN_DEPOSIT,
};

proptest! {
    /// Any whole number of base units survives the round trip exactly.
    #[test]
    fn base_units_round_trip_exactly(
        units in 1u64..1_000_000_000_000,
        decimals in 0u8..=18,
    ) {
        let decimal = from_base_units(U256::from(units), decimals)
            .expect("u64 fits the mantissa");
        let back = to_base_units(decimal, decimals).expect("round trip must scale");
        prop_assert_eq!(back, U256::from(units));
    }

    /// Scaling is monotonic: more tokens never yield fewer base units.
    #[test]
    fn scaling_is_monotonic(
        a in 1u64..1_000_000_000,
        b in 1u64..1_000_000_000,
    ) {
        let da = Decimal::from(a);
        let db = Decimal::from(b);
        let ua = to_base_units(da, 6).unwrap();
        let ub = to_base_units(db, 6).unwrap();
        prop_assert_eq!(a <= b, ua <= ub);
    }

    /// Every amount below the minimum is rejected before scaling.
    #[test]
    fn sub_minimum_amounts_always_rejected(nanos in 0u64..10_000) {
        // nanos * 1e-9 spans [0, 0.00001) exclusive of the minimum
        let amount = Decimal::new(i64::try_from(nanos).unwrap(), 9);
        prop_assert!(amount < MIN_DEPOSIT);
        prop_assert!(ensure_minimum(amount).is_err());
    }

    /// Amounts with more fractional digits than the token supports are
    /// rejected, never silently rounded.
    #[test]
    fn excess_precision_always_rejected(frac in 1u32..999_999) {
        // scale 13 digits against a 6-decimal token; reject whenever the
        // normalized scale still exceeds 6
        let amount = Decimal::from(1) + Decimal::new(i64::from(frac), 13);
        if amount.normalize().scale() > 6 {
            prop_assert!(to_base_units(amount, 6).is_err());
        } else {
            prop_assert!(to_base_units(amount, 6).is_ok());
        }
    }
}
