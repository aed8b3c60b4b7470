use freehub::{
    page::{Page, fitness::Capabilities, is_common},
    router::Router,
    sans::frame::DeviceType,
    state::{Aggregator, FeState, Update},
};

const FE: DeviceType = DeviceType::FitnessEquipment;
const PM: DeviceType = DeviceType::PowerMeter;
const HR: DeviceType = DeviceType::HeartRate;

fn decode(device: DeviceType, page: [u8; 8]) -> (Page, Update) {
    Router::default()
        .decode(device, &page)
        .expect("page should be recognized")
}

fn assert_close(found: Option<f32>, expected: f32) {
    let found = found.expect("field should be present");
    assert!(
        (found - expected).abs() < 1e-3,
        "expected {expected}, found {found}"
    );
}

#[test]
fn trainer_data() {
    let (page, update) = decode(FE, [0x19, 0x01, 0x50, 0x0A, 0x00, 0x96, 0x00, 0x30]);

    assert_eq!(page, Page::TrainerData);
    assert_eq!(update.cadence, Some(80));
    assert_eq!(update.accumulated_power, Some(10));
    assert_eq!(update.instantaneous_power, Some(150));
    assert_eq!(update.trainer_status, Some(0));
    assert_eq!(update.virtual_speed, Some(false));
    assert_eq!(update.fe_state, Some(3));
    assert_eq!(update.speed, None);
    assert_eq!(update.heart_rate, None);
}

#[test]
fn trainer_data_power_spans_nibble() {
    // 0x2_58 watts, trainer status 2 sharing the high byte.
    let (_, update) = decode(FE, [0x19, 0x02, 0x5A, 0x00, 0x01, 0x58, 0x22, 0x21]);

    assert_eq!(update.instantaneous_power, Some(0x258));
    assert_eq!(update.trainer_status, Some(2));
    assert_eq!(update.virtual_speed, Some(true));
    assert_eq!(update.fe_state, Some(2));
}

#[test]
fn trainer_data_sentinels() {
    let (_, update) = decode(FE, [0x19, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F, 0x30]);

    assert_eq!(update.cadence, Some(0));
    assert_eq!(update.accumulated_power, Some(0));
    assert_eq!(update.instantaneous_power, Some(0));
}

#[test]
fn general_fe_data() {
    let (page, update) = decode(FE, [0x10, 0x19, 0x28, 0x64, 0x10, 0x27, 0x8C, 0x30]);

    assert_eq!(page, Page::GeneralFeData);
    assert_eq!(update.elapsed_time, Some(10));
    assert_eq!(update.distance, Some(100));
    assert_close(update.speed, 36.0);
    assert_eq!(update.heart_rate, Some(140));
    assert_eq!(update.fe_state, Some(3));
    assert_eq!(update.cadence, None);
}

#[test]
fn general_fe_data_sentinels() {
    let (_, update) = decode(FE, [0x10, 0x19, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x20]);

    assert_eq!(update.elapsed_time, Some(0));
    assert_eq!(update.distance, Some(0));
    assert_eq!(update.speed, Some(0.0));
    assert_eq!(update.heart_rate, Some(0));
    assert_eq!(update.fe_state, Some(2));
}

#[test]
fn general_settings() {
    let (page, update) = decode(FE, [0x11, 0xFF, 0xFF, 0xAF, 0x38, 0xFF, 0x50, 0x30]);

    assert_eq!(page, Page::TrainerStatus);
    assert_close(update.cycle_length, 1.75);
    assert_close(update.incline, -2.0);
    assert_close(update.resistance, 40.0);
    assert_eq!(update.fe_state, Some(3));
}

#[test]
fn general_settings_sentinels() {
    let (_, update) = decode(FE, [0x11, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F, 0xFF, 0x10]);

    assert_eq!(update.cycle_length, Some(0.0));
    assert_eq!(update.incline, Some(0.0));
    assert_eq!(update.resistance, Some(0.0));
    assert_eq!(update.fe_state, Some(1));
}

#[test]
fn capabilities() {
    let r = [0x36, 0xFF, 0xFF, 0xFF, 0xFF, 0xE8, 0x03, 0x07];

    let (page, update) = decode(FE, r);
    assert_eq!(page, Page::Capabilities);
    assert_eq!(update.max_resistance, Some(1000));
    assert_eq!(update.fe_state, None);

    assert_eq!(
        Capabilities::from_page(&r),
        Capabilities {
            max_resistance: 1000,
            simulation: true,
            erg: true,
            resistance: true,
            wind: false,
            track: false,
        }
    );

    let unknown = Capabilities::from_page(&[0x36, 0, 0, 0, 0, 0xFF, 0xFF, 0x18]);
    assert_eq!(unknown.max_resistance, 0);
    assert!(unknown.wind && unknown.track && !unknown.simulation);
}

#[test]
fn manufacturer_id() {
    let (page, update) = decode(FE, [0x50, 0xFF, 0xFF, 0x03, 0x20, 0x00, 0x34, 0x12]);

    assert_eq!(page, Page::ManufacturerId);
    assert_eq!(update.hardware_revision, Some(3));
    assert_eq!(update.manufacturer_id, Some(32));
    assert_eq!(update.model_number, Some(0x1234));

    let (_, update) = decode(FE, [0x50, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(update.hardware_revision, Some(0));
    assert_eq!(update.manufacturer_id, Some(0));
    assert_eq!(update.model_number, Some(0));
}

#[test]
fn product_info_version() {
    let (page, update) = decode(FE, [0x51, 0xFF, 0x00, 0x05, 0x78, 0x56, 0x34, 0x12]);
    assert_eq!(page, Page::ProductInfo);
    assert_eq!(update.software_version, Some(5));
    assert_eq!(update.serial_number, Some(0x1234_5678));

    let (_, update) = decode(FE, [0x51, 0xFF, 0x02, 0x05, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(update.software_version, Some(502));
    assert_eq!(update.serial_number, Some(0));
}

#[test]
fn battery_status() {
    let (page, update) = decode(PM, [0x52, 0xFF, 0x11, 0x00, 0x00, 0x00, 0x80, 0x33]);

    assert_eq!(page, Page::BatteryStatus);
    assert_eq!(update.battery_status, Some(0x33));
}

#[test]
fn common_pages_from_any_device() {
    let r = [0x50, 0xFF, 0xFF, 0x01, 0x01, 0x00, 0x02, 0x00];

    for device in [FE, PM, HR, DeviceType::BikeSpeed, DeviceType::Unknown] {
        let (page, update) = decode(device, r);
        assert_eq!(page, Page::ManufacturerId);
        assert_eq!(update.manufacturer_id, Some(1));
    }

    assert!(is_common(0x50) && is_common(0x54));
    assert!(!is_common(0x4F) && !is_common(0x55));
}

#[test]
fn power_main_data() {
    let (page, update) = decode(PM, [0x10, 0x01, 0xB2, 0x5A, 0x10, 0x27, 0xFA, 0x00]);

    assert_eq!(page, Page::PowerMainData);
    assert_eq!(update.pedal_power, Some(50));
    assert_eq!(update.right_pedal, Some(true));
    assert_eq!(update.cadence, Some(90));
    assert_eq!(update.accumulated_power, Some(10000));
    assert_eq!(update.instantaneous_power, Some(250));
    assert_eq!(update.fe_state, None);

    let (_, update) = decode(PM, [0x10, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(update.pedal_power, Some(0));
    assert_eq!(update.right_pedal, Some(false));
    assert_eq!(update.cadence, Some(0));
    assert_eq!(update.accumulated_power, Some(0));
    assert_eq!(update.instantaneous_power, Some(0));
}

#[test]
fn heart_rate_ignores_toggle_bit() {
    for id in [0x00, 0x04, 0x82, 0x84] {
        let (page, update) = decode(HR, [id, 0xFF, 0xFF, 0xFF, 0x00, 0x10, 0x20, 0x8C]);
        assert_eq!(page, Page::HeartRate);
        assert_eq!(update.heart_rate, Some(140));
    }

    let (_, update) = decode(HR, [0x00, 0, 0, 0, 0, 0, 0, 0xFF]);
    assert_eq!(update.heart_rate, Some(0));
}

#[test]
fn same_identifier_depends_on_device() {
    let r = [0x10, 0x01, 0xB2, 0x5A, 0x10, 0x27, 0xFA, 0x30];

    assert_eq!(decode(FE, r).0, Page::GeneralFeData);
    assert_eq!(decode(PM, r).0, Page::PowerMainData);
}

#[test]
fn ignore_unknown_pages() {
    let router = Router::default();

    assert!(router.decode(FE, &[0x99, 0, 0, 0, 0, 0, 0, 0]).is_none());
    assert!(router.decode(PM, &[0x19, 0, 0, 0, 0, 0, 0, 0]).is_none());
    assert!(router.decode(HR, &[0x05, 0, 0, 0, 0, 0, 0, 0]).is_none());
    assert!(router.decode(DeviceType::BikeCadence, &[0x00, 0, 0, 0, 0, 0, 0, 0]).is_none());

    let mut aggregator = Aggregator::new();
    assert_eq!(router.route(FE, &[0x99, 0, 0, 0, 0, 0, 0, 0], &mut aggregator), None);
    assert!(!aggregator.take_new_data());
    assert!(!aggregator.state().has_data);
}

#[test]
fn route_into_aggregator() {
    let router = Router::default();
    let mut aggregator = Aggregator::new();

    let page = router.route(FE, &[0x19, 0x01, 0x50, 0x0A, 0x00, 0x96, 0x00, 0x30], &mut aggregator);

    assert_eq!(page, Some(Page::TrainerData));
    let state = aggregator.snapshot();
    assert!(state.has_data);
    assert_eq!(state.cadence, 80);
    assert_eq!(state.instantaneous_power, 150);
    assert_eq!(state.equipment_state(), Some(FeState::InUse));
}
