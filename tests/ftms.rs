use freehub::{
    ftms::{
        Characteristic, INDOOR_BIKE_DATA_FLAGS, INDOOR_BIKE_DATA_LEN, SERVICE_UUID,
        encode_feature, encode_indoor_bike_data,
        status::{MachineStatus, StatusTracker, StopKind, TrainingStatus},
    },
    state::SensorState,
};

fn riding() -> SensorState {
    SensorState {
        elapsed_time: 10,
        distance: 100,
        speed: 36.0,
        instantaneous_power: 150,
        cadence: 80,
        resistance: 40.0,
        fe_state: 3,
        trainer_status: 2,
        has_data: true,
        ..Default::default()
    }
}

#[test]
fn indoor_bike_data_layout() {
    let data = encode_indoor_bike_data(&riding());

    assert_eq!(data.len(), INDOOR_BIKE_DATA_LEN);
    assert_eq!(
        data,
        [
            0x74, 0x08, // flags
            0x10, 0x0E, // 36.00 km/h
            0xA0, 0x00, // 80 rpm
            0x64, 0x00, 0x00, // 100 m
            0x90, 0x01, // 40.0 %
            0x96, 0x00, // 150 W
            0x0A, 0x00, // 10 s
        ]
    );
}

#[test]
fn indoor_bike_data_fields_decode_back() {
    let state = SensorState {
        elapsed_time: 3725,
        distance: 42_195,
        speed: 27.35,
        instantaneous_power: 312,
        cadence: 93,
        resistance: 12.5,
        ..Default::default()
    };
    let data = encode_indoor_bike_data(&state);

    let u16_at = |i: usize| u16::from_le_bytes([data[i], data[i + 1]]);
    let i16_at = |i: usize| i16::from_le_bytes([data[i], data[i + 1]]);

    assert_eq!(u16_at(0), INDOOR_BIKE_DATA_FLAGS);
    assert_eq!(u16_at(2), 2735);
    assert_eq!(u16_at(4) / 2, 93);
    assert_eq!(u32::from_le_bytes([data[6], data[7], data[8], 0]), 42_195);
    assert_eq!(i16_at(9), 125);
    assert_eq!(i16_at(11), 312);
    assert_eq!(u16_at(13), 3725);
}

#[test]
fn indoor_bike_data_flags_announce_fields() {
    let flags = INDOOR_BIKE_DATA_FLAGS;

    // Bit 0 clear: instantaneous speed present.
    assert_eq!(flags & 0x0001, 0);
    for bit in [2, 4, 5, 6, 11] {
        assert_ne!(flags & 1 << bit, 0, "bit {bit} should be set");
    }
    assert_eq!(flags.count_ones(), 5);
}

#[test]
fn indoor_bike_data_saturates() {
    let data = encode_indoor_bike_data(&SensorState {
        distance: 0x0100_0000,
        instantaneous_power: 40_000,
        speed: 1000.0,
        ..Default::default()
    });

    assert_eq!(&data[2..4], &[0xFF, 0xFF]);
    assert_eq!(&data[6..9], &[0xFF, 0xFF, 0xFF]);
    assert_eq!(&data[11..13], &i16::MAX.to_le_bytes());
}

#[test]
fn indoor_bike_data_of_empty_state() {
    let data = encode_indoor_bike_data(&SensorState::default());

    assert_eq!(&data[..2], &INDOOR_BIKE_DATA_FLAGS.to_le_bytes());
    assert!(data[2..].iter().all(|&b| b == 0));
}

#[test]
fn feature_value() {
    assert_eq!(encode_feature(), [0x86, 0x50, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn assigned_numbers() {
    assert_eq!(SERVICE_UUID, 0x1826);
    assert_eq!(Characteristic::FitnessMachineFeature.uuid(), 0x2ACC);
    assert_eq!(Characteristic::IndoorBikeData.uuid(), 0x2AD2);
    assert_eq!(Characteristic::TrainingStatus.uuid(), 0x2AD3);
    assert_eq!(Characteristic::FitnessMachineStatus.uuid(), 0x2ADA);
}

#[test]
fn encode_machine_status() {
    assert_eq!(MachineStatus::Reset.encode().as_bytes(), &[0x01]);
    assert_eq!(
        MachineStatus::StoppedOrPaused(StopKind::Stop).encode().as_bytes(),
        &[0x02, 0x01]
    );
    assert_eq!(
        MachineStatus::StoppedOrPaused(StopKind::Pause).encode().as_bytes(),
        &[0x02, 0x02]
    );
    assert_eq!(MachineStatus::StartedOrResumed.encode().as_bytes(), &[0x04]);
    assert_eq!(
        MachineStatus::TargetSpeedChanged(3600).encode().as_bytes(),
        &[0x05, 0x10, 0x0E]
    );
    assert_eq!(
        MachineStatus::TargetInclineChanged(-20).encode().as_bytes(),
        &[0x06, 0xEC, 0xFF]
    );
    assert_eq!(
        MachineStatus::TargetResistanceChanged(400).encode().as_ref(),
        &[0x07, 0x90, 0x01]
    );
    assert_eq!(
        MachineStatus::TargetPowerChanged(150).encode().as_bytes(),
        &[0x08, 0x96, 0x00]
    );
}

#[test]
fn translate_training_status() {
    assert_eq!(TrainingStatus::from_trainer(0), TrainingStatus::Idle);
    assert_eq!(TrainingStatus::from_trainer(1), TrainingStatus::WarmingUp);
    assert_eq!(TrainingStatus::from_trainer(2), TrainingStatus::ManualMode);
    assert_eq!(TrainingStatus::from_trainer(3), TrainingStatus::Idle);
    assert_eq!(TrainingStatus::from_trainer(4), TrainingStatus::CoolDown);
    assert_eq!(TrainingStatus::from_trainer(7), TrainingStatus::Other);

    assert_eq!(TrainingStatus::ManualMode.encode(), [0x00, 0x0D]);
    assert_eq!(TrainingStatus::Other.encode(), [0x00, 0x00]);
}

#[test]
fn report_state_on_first_snapshot() {
    let mut tracker = StatusTracker::new();

    let report = tracker.update(&SensorState {
        fe_state: 2,
        ..Default::default()
    });

    assert_eq!(report.machine().collect::<Vec<_>>(), [MachineStatus::Reset]);
    assert_eq!(report.training, Some(TrainingStatus::Idle));
}

#[test]
fn report_only_changes() {
    let mut tracker = StatusTracker::new();
    tracker.update(&SensorState {
        fe_state: 2,
        ..Default::default()
    });

    let report = tracker.update(&riding());
    assert_eq!(
        report.machine().collect::<Vec<_>>(),
        [
            MachineStatus::StartedOrResumed,
            MachineStatus::TargetSpeedChanged(3600),
            MachineStatus::TargetResistanceChanged(400),
            MachineStatus::TargetPowerChanged(150),
        ]
    );
    assert_eq!(report.training, Some(TrainingStatus::ManualMode));

    assert!(tracker.update(&riding()).is_empty());
}

#[test]
fn report_target_changes() {
    let mut tracker = StatusTracker::new();
    tracker.update(&riding());

    let report = tracker.update(&SensorState {
        incline: -2.0,
        resistance: 5.0,
        instantaneous_power: 0,
        ..riding()
    });

    assert_eq!(
        report.machine().collect::<Vec<_>>(),
        [
            MachineStatus::TargetInclineChanged(-20),
            MachineStatus::TargetResistanceChanged(50),
        ]
    );
    assert_eq!(report.training, None);
}

#[test]
fn report_resistance_changes_above_quarter() {
    let mut tracker = StatusTracker::new();
    tracker.update(&SensorState {
        resistance: 30.0,
        ..riding()
    });

    let report = tracker.update(&riding());
    assert_eq!(
        report.machine().collect::<Vec<_>>(),
        [MachineStatus::TargetResistanceChanged(400)]
    );

    let report = tracker.update(&SensorState {
        resistance: 100.0,
        ..riding()
    });
    assert_eq!(
        report.machine().collect::<Vec<_>>(),
        [MachineStatus::TargetResistanceChanged(1000)]
    );
    assert_eq!(
        report.machine().next().unwrap().encode().as_bytes(),
        &[0x07, 0xE8, 0x03]
    );
}

#[test]
fn report_pause_and_stop() {
    let mut tracker = StatusTracker::new();
    tracker.update(&riding());

    let paused = SensorState {
        trainer_status: 3,
        ..riding()
    };
    let report = tracker.update(&paused);
    assert_eq!(
        report.machine().collect::<Vec<_>>(),
        [MachineStatus::StoppedOrPaused(StopKind::Pause)]
    );
    assert_eq!(report.training, Some(TrainingStatus::Idle));

    let report = tracker.update(&SensorState {
        fe_state: 4,
        ..paused
    });
    assert_eq!(
        report.machine().collect::<Vec<_>>(),
        [MachineStatus::StoppedOrPaused(StopKind::Stop)]
    );
    assert_eq!(report.training, None);
}

#[test]
fn forget_snapshot_on_reset() {
    let mut tracker = StatusTracker::new();
    tracker.update(&riding());
    assert!(tracker.update(&riding()).is_empty());

    tracker.reset();

    let report = tracker.update(&riding());
    assert_eq!(
        report.machine().next(),
        Some(MachineStatus::StartedOrResumed)
    );
    assert_eq!(report.training, Some(TrainingStatus::ManualMode));
}
