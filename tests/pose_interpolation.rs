#![allow(missing_docs)]
//! Host-level tests for lockstep pose interpolation.

use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Duration;
use servo_choreo::Error;
use servo_choreo::channel::{ChannelId, ServoCalibration, ServoChannel};
use servo_choreo::duty::convert;
use servo_choreo::interpolate::{interpolate, steps};
use servo_choreo::mock::{Journal, MockDelay, MockEvent, MockOutput, mock_rig};
use servo_choreo::pacer::Pacer;
use servo_choreo::pose::Pose;
use servo_choreo::rig::ServoRig;

const STEP: Duration = Duration::from_millis(5);

#[test]
fn first_waypoint_takes_180_lockstep_steps() {
    let poses: Vec<Pose<5>> = steps(Pose::splat(0), Pose::new([180, 0, 90, 0, 0])).collect();
    assert_eq!(poses.len(), 180);

    for (index, pose) in poses.iter().enumerate() {
        let step = u16::try_from(index + 1).unwrap();
        assert_eq!(pose[0], step, "axis 0 at step {step}");
        assert_eq!(pose[1], 0);
        assert_eq!(pose[2], step.min(90), "axis 2 at step {step}");
        assert_eq!(pose[3], 0);
        assert_eq!(pose[4], 0);
    }
    assert_eq!(poses[89][2], 90);
    assert_eq!(poses[88][2], 89);
    assert_eq!(poses[178][0], 179);
    assert_eq!(poses[179], Pose::new([180, 0, 90, 0, 0]));
}

#[test]
fn steps_move_both_directions() {
    let poses: Vec<Pose<3>> = steps(Pose::new([10, 5, 7]), Pose::new([8, 8, 7])).collect();
    assert_eq!(
        poses,
        [
            Pose::new([9, 6, 7]),
            Pose::new([8, 7, 7]),
            Pose::new([8, 8, 7]),
        ]
    );
}

#[test]
fn steps_report_exact_length() {
    let poses = steps(Pose::<4>::splat(30), Pose::new([0, 30, 45, 31]));
    assert_eq!(poses.len(), 30);
    assert_eq!(steps(Pose::<4>::splat(30), Pose::splat(30)).len(), 0);
}

#[test]
fn equal_poses_write_nothing() {
    let journal = Journal::default();
    let mut rig = mock_rig::<5>(&journal);
    let stop = Signal::<NoopRawMutex, ()>::new();
    let mut pacer = Pacer::new(MockDelay::new(&journal), &stop);
    let pose = Pose::new([10, 20, 30, 40, 50]);

    let reached = block_on(interpolate(&mut rig, &mut pacer, pose, pose, STEP)).unwrap();

    assert_eq!(reached, pose);
    assert!(journal.events().is_empty());
}

#[test]
fn writes_every_servo_every_tick_then_sleeps_once() {
    let journal = Journal::default();
    let mut rig = mock_rig::<5>(&journal);
    let stop = Signal::<NoopRawMutex, ()>::new();
    let mut pacer = Pacer::new(MockDelay::new(&journal), &stop);
    let target = Pose::new([180, 0, 90, 0, 0]);

    let reached =
        block_on(interpolate(&mut rig, &mut pacer, Pose::splat(0), target, STEP)).unwrap();

    assert_eq!(reached, target);
    assert_eq!(journal.duties().len(), 180 * 5);
    assert_eq!(journal.sleeps(), vec![5_000; 180]);

    // Each tick is five writes in channel order followed by one sleep.
    for tick in journal.events().chunks(6) {
        let channels: Vec<ChannelId> = tick
            .iter()
            .filter_map(|event| match event {
                MockEvent::Duty { channel, .. } => Some(*channel),
                MockEvent::Release { .. } | MockEvent::Sleep { .. } => None,
            })
            .collect();
        assert_eq!(channels, (0..5).map(ChannelId).collect::<Vec<_>>());
        assert_eq!(tick[5], MockEvent::Sleep { micros: 5_000 });
    }
}

#[test]
fn last_tick_writes_target_duties() {
    let journal = Journal::default();
    let mut rig = mock_rig::<5>(&journal);
    let stop = Signal::<NoopRawMutex, ()>::new();
    let mut pacer = Pacer::new(MockDelay::new(&journal), &stop);
    let target = Pose::new([180, 0, 90, 0, 0]);

    block_on(interpolate(&mut rig, &mut pacer, Pose::splat(0), target, STEP)).unwrap();

    let duties = journal.duties();
    let last_tick = &duties[duties.len() - 5..];
    let expected: Vec<(ChannelId, u16)> = target
        .iter()
        .enumerate()
        .map(|(index, degrees)| {
            (
                ChannelId(u8::try_from(index).unwrap()),
                convert(i32::from(*degrees), &ServoCalibration::DEFAULT).duty,
            )
        })
        .collect();
    assert_eq!(last_tick, expected.as_slice());
    assert_eq!(last_tick[0].1, 8_191);
    assert_eq!(last_tick[2].1, 4_915);
    assert_eq!(last_tick[1].1, 1_638);
}

#[test]
fn write_failure_stops_the_move() {
    let journal = Journal::default();
    let mut rig = ServoRig::new([
        ServoChannel::new(
            ChannelId(0),
            ServoCalibration::DEFAULT,
            MockOutput::new(ChannelId(0), &journal),
        ),
        ServoChannel::new(
            ChannelId(1),
            ServoCalibration::DEFAULT,
            MockOutput::new(ChannelId(1), &journal).failing_writes(),
        ),
    ]);
    let stop = Signal::<NoopRawMutex, ()>::new();
    let mut pacer = Pacer::new(MockDelay::new(&journal), &stop);

    let result = block_on(interpolate(
        &mut rig,
        &mut pacer,
        Pose::splat(0),
        Pose::splat(10),
        STEP,
    ));

    assert!(matches!(
        result,
        Err(Error::DutyWrite {
            channel: ChannelId(1)
        })
    ));
    assert_eq!(
        journal.events(),
        vec![MockEvent::Duty {
            channel: ChannelId(0),
            duty: convert(1, &ServoCalibration::DEFAULT).duty,
        }]
    );
}

#[test]
fn stop_interrupts_between_ticks() {
    let journal = Journal::default();
    let mut rig = mock_rig::<2>(&journal);
    let stop = Signal::<NoopRawMutex, ()>::new();
    let mut pacer = Pacer::new(MockDelay::new(&journal).raising_stop_after(3, &stop), &stop);

    let result = block_on(interpolate(
        &mut rig,
        &mut pacer,
        Pose::splat(0),
        Pose::splat(10),
        STEP,
    ));

    assert!(matches!(result, Err(Error::Interrupted)));
    // Four ticks written, three sleeps completed, the fourth sleep interrupted.
    assert_eq!(journal.duties().len(), 4 * 2);
    assert_eq!(journal.sleeps().len(), 3);
}
