//! Compile-only verification that both channels of one PWM slice can drive servos in the
//! same rig, wired on adjacent pins.
//! Run via: `cargo build --no-default-features --features embedded --target thumbv6m-none-eabi --bin pico_pwm_shared_slice`

#![cfg(not(feature = "host"))]
#![no_std]
#![no_main]
#![allow(dead_code, reason = "Compile-time verification only")]

use core::future;

use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::pwm::{Config, Pwm};
use panic_probe as _;
use servo_choreo::channel::{ChannelId, ServoCalibration, ServoChannel};
use servo_choreo::pico_pwm::{PicoPwmOutput, PicoPwmSlice};
use servo_choreo::pose::Pose;
use servo_choreo::rig::{ReleaseReport, ServoRig};

fn gp0_gp1_rig<'s, 'd>(slice0: &'s PicoPwmSlice<'d>) -> ServoRig<PicoPwmOutput<'s, 'd>, 2> {
    let calibration = ServoCalibration::DEFAULT;
    ServoRig::new([
        ServoChannel::new(ChannelId(0), calibration, slice0.output_a()),
        ServoChannel::new(ChannelId(1), calibration, slice0.output_b()),
    ])
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) -> ! {
    let p = embassy_rp::init(Default::default());
    let slice0 = PicoPwmSlice::new(
        Pwm::new_output_ab(p.PWM_SLICE0, p.PIN_0, p.PIN_1, Config::default()),
        ServoCalibration::DEFAULT.frequency_hz(),
    );

    let mut rig = gp0_gp1_rig(&slice0);
    if rig.write_pose(&Pose::new([90, 45])).is_err() {
        defmt::warn!("duty write failed");
    }
    let report: ReleaseReport<2> = rig.release_all();
    defmt::info!("released {} of {}", report.released(), report.attempted());

    future::pending().await
}
