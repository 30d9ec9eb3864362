#![no_main]

use libfuzzer_sys::fuzz_target;
use z140_core::{
    decode_pattern, decode_period, decode_status, OpenConfig, PeriodClass, RegisterAccess,
    SimulatedIpCore, StatCode, Z140Device,
};

fuzz_target!(|data: &[u8]| {
    if data.len() < 12 {
        return;
    }

    let word = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let code = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    let value = i32::from_le_bytes([data[8], data[9], data[10], data[11]]);

    let reading = decode_period(word);
    assert!(reading.magnitude <= 0x1FFF_FFFF);
    if word & 0x8000_0000 == 0 {
        assert_eq!(reading.class, PeriodClass::NoNewData);
    }
    assert_eq!(decode_status(word).bits(), word & 0x1F);
    let _ = decode_pattern(word);

    let mut core = SimulatedIpCore::new();
    let _ = core.write32(word, word);
    let Ok(mut device) = Z140Device::open(core, &OpenConfig::default()) else {
        return;
    };
    let _ = device.set_stat(code, i64::from(value));
    let _ = device.get_stat(code);
    let _ = device.get_stat(StatCode::PeriodA.raw());
    let _ = device.close();
});
