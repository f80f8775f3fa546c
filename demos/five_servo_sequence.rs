//! Five servos on GP0 through GP4 glide together through seven poses.
//!
//! GP0/GP1 and GP2/GP3 are the A/B pins of PWM slices 0 and 1, and GP4 is channel A of
//! slice 2. Ground GP15 through a button to stop early; every servo is released either
//! way.
#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::{convert::Infallible, future, panic};

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::pwm::{Config, Pwm};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Delay, Duration};
use servo_choreo::{
    Error, Result,
    channel::{ChannelId, ServoCalibration, ServoChannel},
    choreography::{AtEnd, Choreography, perform},
    pacer::Pacer,
    pico_pwm::PicoPwmSlice,
    pose::{Pose, Waypoint},
    rig::ServoRig,
};
use {defmt_rtt as _, panic_probe as _};

const HOLD: Duration = Duration::from_secs(10);

const WAYPOINTS: [Waypoint<5>; 7] = [
    Waypoint::new([180, 180, 180, 180, 180], HOLD),
    Waypoint::new([0, 180, 180, 180, 180], HOLD),
    Waypoint::new([0, 0, 180, 180, 180], HOLD),
    Waypoint::new([0, 0, 0, 180, 180], HOLD),
    Waypoint::new([0, 0, 0, 0, 180], HOLD),
    Waypoint::new([0, 0, 0, 0, 0], HOLD),
    Waypoint::new([180, 180, 0, 0, 0], HOLD),
];

const CHOREOGRAPHY: Choreography<'static, 5> = Choreography {
    home: Pose::splat(0),
    settle: Duration::from_secs(1),
    step_delay: Duration::from_millis(5),
    waypoints: &WAYPOINTS,
    at_end: AtEnd::ReturnHome,
};

static STOP: Signal<CriticalSectionRawMutex, ()> = Signal::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());
    let button = Input::new(p.PIN_15, Pull::Up);
    spawner
        .spawn(stop_on_press(button))
        .map_err(Error::TaskSpawn)?;

    let calibration = ServoCalibration::DEFAULT;
    let frequency_hz = calibration.frequency_hz();
    // slice = (pin / 2) % 8; even pins are channel A, odd pins channel B
    let slice0 = PicoPwmSlice::new(
        Pwm::new_output_ab(p.PWM_SLICE0, p.PIN_0, p.PIN_1, Config::default()),
        frequency_hz,
    );
    let slice1 = PicoPwmSlice::new(
        Pwm::new_output_ab(p.PWM_SLICE1, p.PIN_2, p.PIN_3, Config::default()),
        frequency_hz,
    );
    let slice2 = PicoPwmSlice::new(
        Pwm::new_output_a(p.PWM_SLICE2, p.PIN_4, Config::default()),
        frequency_hz,
    );
    let rig = ServoRig::new([
        ServoChannel::new(ChannelId(0), calibration, slice0.output_a()),
        ServoChannel::new(ChannelId(1), calibration, slice0.output_b()),
        ServoChannel::new(ChannelId(2), calibration, slice1.output_a()),
        ServoChannel::new(ChannelId(3), calibration, slice1.output_b()),
        ServoChannel::new(ChannelId(4), calibration, slice2.output_a()),
    ]);

    let mut pacer = Pacer::new(Delay, &STOP);
    let performance = perform(rig, &CHOREOGRAPHY, &mut pacer).await;
    match performance.outcome {
        Ok(pose) => info!("Done at {}", pose),
        Err(err) => warn!("Stopped: {}", err),
    }
    info!(
        "Released {} of {} servos",
        performance.release.released(),
        performance.release.attempted()
    );

    future::pending().await
}

#[embassy_executor::task]
async fn stop_on_press(mut button: Input<'static>) -> ! {
    button.wait_for_falling_edge().await;
    info!("Stop button pressed");
    STOP.signal(());
    future::pending().await
}
