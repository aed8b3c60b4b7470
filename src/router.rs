//! Dispatch of ANT+ pages to their extractors.
//!
//! Pages in the common range are routed by identifier alone. All others are
//! looked up by device type and identifier in a table of [`Route`]s, so new
//! device types are supported by extending the table rather than the
//! dispatch logic.

use log::{debug, warn};

use crate::{
    page::{self, Page, common, fitness, heart_rate, power},
    sans::frame::{DeviceType, PAYLOAD_LEN},
    state::{Aggregator, Update},
};

/// A function extracting the fields carried by a page.
pub type Extractor = fn(&[u8; PAYLOAD_LEN]) -> Update;

/// An entry of the dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    /// The device type this layout belongs to, or `None` for common pages.
    pub device: Option<DeviceType>,
    pub page: u8,
    pub kind: Page,
    pub extract: Extractor,
}

const fn route(device: Option<DeviceType>, page: u8, kind: Page, extract: Extractor) -> Route {
    Route {
        device,
        page,
        kind,
        extract,
    }
}

const FE: Option<DeviceType> = Some(DeviceType::FitnessEquipment);
const PM: Option<DeviceType> = Some(DeviceType::PowerMeter);
const HR: Option<DeviceType> = Some(DeviceType::HeartRate);

/// The routes understood by the default router.
pub static ROUTES: &[Route] = &[
    route(None, common::MANUFACTURER_ID, Page::ManufacturerId, common::manufacturer_id),
    route(None, common::PRODUCT_INFO, Page::ProductInfo, common::product_info),
    route(None, common::BATTERY_STATUS, Page::BatteryStatus, common::battery_status),
    route(FE, fitness::GENERAL_FE_DATA, Page::GeneralFeData, fitness::general_fe_data),
    route(FE, fitness::GENERAL_SETTINGS, Page::TrainerStatus, fitness::general_settings),
    route(FE, fitness::TRAINER_DATA, Page::TrainerData, fitness::trainer_data),
    route(FE, fitness::CAPABILITIES, Page::Capabilities, fitness::capabilities),
    route(PM, power::POWER_MAIN_DATA, Page::PowerMainData, power::power_main_data),
    route(HR, heart_rate::DATA_PAGES[0], Page::HeartRate, heart_rate::heart_rate),
    route(HR, heart_rate::DATA_PAGES[1], Page::HeartRate, heart_rate::heart_rate),
    route(HR, heart_rate::DATA_PAGES[2], Page::HeartRate, heart_rate::heart_rate),
    route(HR, heart_rate::DATA_PAGES[3], Page::HeartRate, heart_rate::heart_rate),
    route(HR, heart_rate::DATA_PAGES[4], Page::HeartRate, heart_rate::heart_rate),
];

/// Selects and applies the extractor for a page.
#[derive(Debug, Clone, Copy)]
pub struct Router {
    routes: &'static [Route],
}

impl Default for Router {
    fn default() -> Self {
        Self::new(ROUTES)
    }
}

impl Router {
    pub const fn new(routes: &'static [Route]) -> Self {
        Self { routes }
    }

    /// Find the route for a page sent by a device type.
    pub fn lookup(&self, device: DeviceType, page: u8) -> Option<&'static Route> {
        let (device, page) = if page::is_common(page) {
            (None, page)
        } else if device == DeviceType::HeartRate {
            (Some(device), page & !heart_rate::TOGGLE)
        } else {
            (Some(device), page)
        };

        self.routes
            .iter()
            .find(|r| r.device == device && r.page == page)
    }

    /// Decode a page, returning its layout and the fields it carries.
    ///
    /// Unrecognized combinations of device type and page are logged and
    /// skipped; live sensors are expected to send them.
    pub fn decode(&self, device: DeviceType, r: &[u8; PAYLOAD_LEN]) -> Option<(Page, Update)> {
        let Some(route) = self.lookup(device, r[0]) else {
            warn!("Ignoring unknown page {:#04x} from {device:?}.", r[0]);
            return None;
        };

        let update = (route.extract)(r);
        debug!("Decoded {:?} from {device:?}: {update:?}", route.kind);

        Some((route.kind, update))
    }

    /// Decode a page and merge its fields into an aggregator.
    pub fn route(&self, device: DeviceType, r: &[u8; PAYLOAD_LEN], o: &mut Aggregator) -> Option<Page> {
        let (page, update) = self.decode(device, r)?;
        o.apply(&update);
        Some(page)
    }
}
