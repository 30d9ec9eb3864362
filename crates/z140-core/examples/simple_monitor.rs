//! Polls a simulated 16Z140 and prints one row of readings per cycle.

use log as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

use z140_core::{
    Channel, ConfigField, DriverError, OpenConfig, PeriodClass, SimulatedIpCore, StatusFlags,
    Z140Device,
};

const CYCLES: u32 = 8;

fn period_column(
    device: &mut Z140Device<SimulatedIpCore>,
    channel: Channel,
) -> Result<String, DriverError> {
    let reading = device.period(channel)?;
    Ok(match reading.class {
        PeriodClass::Valid => format!("{:8}.{:03}", reading.micros(), reading.nanos()),
        PeriodClass::NoNewData => format!("{:>12}", "no-new-data"),
        PeriodClass::PhaseViolation => format!("{:>12}", "phase-err"),
        PeriodClass::Invalid => format!("{:>12}", "period-err"),
    })
}

fn status_column(flags: StatusFlags) -> String {
    [
        flags.invalid_direction,
        flags.backward,
        flags.forward,
        flags.standstill,
        flags.rolling,
    ]
    .iter()
    .map(|set| if *set { "x" } else { " " })
    .collect::<Vec<_>>()
    .join(" ")
}

fn drive_signal(core: &mut SimulatedIpCore, cycle: u32) {
    let magnitude = 0x0040_0000 + cycle * 0x21;
    let class = if cycle % 3 == 2 {
        PeriodClass::NoNewData
    } else {
        PeriodClass::Valid
    };
    core.latch_period(Channel::A, magnitude, class);
    core.latch_period(Channel::B, magnitude + 0x10, PeriodClass::Valid);
    core.set_distances(cycle * 25, 0);
    core.set_status(StatusFlags {
        rolling: true,
        forward: true,
        ..StatusFlags::default()
    });
}

fn main() -> Result<(), DriverError> {
    let mut device = Z140Device::open(SimulatedIpCore::new(), &OpenConfig::default())?;
    device.reset_distance_counters()?;

    for field in ConfigField::ALL {
        println!(
            "{:<28}: {}{}",
            field.label(),
            device.field(field)?,
            field.spec().unit.suffix()
        );
    }

    println!();
    println!("                                              +--------- Invalid dir");
    println!("                                              | +------- Backward dir");
    println!("                                              | | +----- Forward dir");
    println!("                                              | | | +--- Standstill");
    println!("                                              | | | | +- Rolling");
    println!("                                              | | | | |");
    println!("      [us]         [us]     [pulses]   [pulses]   I B F S R");
    println!("period-A     period-B     dist-fwd   dist-bwd     status");

    for cycle in 0..CYCLES {
        drive_signal(device.registers_mut(), cycle);
        let period_a = period_column(&mut device, Channel::A)?;
        let period_b = period_column(&mut device, Channel::B)?;
        let forward = device.distance_forward()?;
        let backward = device.distance_backward()?;
        let status = status_column(device.status()?);
        println!("{period_a} {period_b} {forward:10} {backward:10}   {status}");
    }

    device.close()?;
    Ok(())
}
