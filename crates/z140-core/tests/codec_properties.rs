//! Property coverage for the configuration codec and the register word decoders.

use log as _;
use proptest::prelude::*;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

use z140_core::{decode_period, decode_status, ConfigField, DriverError, PeriodClass, StatusFlags};

fn any_field() -> impl Strategy<Value = ConfigField> {
    prop::sample::select(ConfigField::ALL.to_vec())
}

proptest! {
    #[test]
    fn property_step_aligned_values_round_trip(field in any_field(), index in 0_u32..1000) {
        let spec = field.spec();
        let steps = (spec.max - spec.min) / spec.step;
        let value = spec.min + (index % (steps + 1)) * spec.step;

        let ticks = field.encode_ticks(value).expect("aligned in-range value");
        prop_assert_eq!(field.decode_ticks(ticks), value);
    }

    #[test]
    fn property_unaligned_or_out_of_range_values_rejected(field in any_field(), value in any::<u32>()) {
        let spec = field.spec();
        let accepted = value >= spec.min && value <= spec.max && value.is_multiple_of(spec.step);
        if accepted {
            prop_assert!(field.encode_ticks(value).is_ok());
        } else {
            prop_assert_eq!(field.encode_ticks(value), Err(DriverError::InvalidParam));
        }
    }

    #[test]
    fn property_missing_new_bit_is_always_no_new_data(raw in any::<u32>()) {
        let reading = decode_period(raw & 0x7FFF_FFFF);
        prop_assert_eq!(reading.class, PeriodClass::NoNewData);
    }

    #[test]
    fn property_phase_violation_wins_over_valid(raw in any::<u32>()) {
        let reading = decode_period(raw | 0xC000_0000);
        prop_assert_eq!(reading.class, PeriodClass::PhaseViolation);
    }

    #[test]
    fn property_new_and_valid_yield_magnitude(magnitude in 0_u32..=0x1FFF_FFFF) {
        let reading = decode_period(0x8000_0000 | 0x2000_0000 | magnitude);
        prop_assert_eq!(reading.class, PeriodClass::Valid);
        prop_assert_eq!(reading.magnitude, magnitude);
        prop_assert_eq!(reading.into_result(), Ok(magnitude));
    }
}

#[test]
fn bounds_reject_one_step_outside() {
    for field in ConfigField::ALL {
        let spec = field.spec();
        assert!(field.encode_ticks(spec.min).is_ok());
        assert!(field.encode_ticks(spec.max).is_ok());
        assert_eq!(
            field.encode_ticks(spec.max + spec.step),
            Err(DriverError::InvalidParam)
        );
        if let Some(below) = spec.min.checked_sub(spec.step) {
            assert_eq!(field.encode_ticks(below), Err(DriverError::InvalidParam));
        }
    }
}

#[test]
fn magnitude_0x21_is_one_microsecond_31_nanoseconds() {
    let reading = decode_period(0xA000_0021);
    assert_eq!(reading.micros(), 1);
    assert_eq!(reading.nanos(), 31);
}

#[test]
fn status_decoding_covers_all_low_bit_combinations() {
    for raw in 0_u32..32 {
        let flags = decode_status(raw);
        assert_eq!(
            flags,
            StatusFlags {
                rolling: raw & 0x01 != 0,
                standstill: raw & 0x02 != 0,
                forward: raw & 0x04 != 0,
                backward: raw & 0x08 != 0,
                invalid_direction: raw & 0x10 != 0,
            }
        );
        assert_eq!(flags.bits(), raw);
        assert_eq!(flags.names().count(), raw.count_ones() as usize);
    }
}
