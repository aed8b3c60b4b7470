//! The control loop joining the decoders, the aggregator and the encoder.
//!
//! A [`Bridge`] owns a single decoder, router, aggregator and status tracker,
//! and is driven from one loop:
//!
//! - [`Bridge::feed`] with whatever bytes the serial link has available.
//! Sensor frames update the sensor state; command frames are handed to a
//! [`Console`].
//!
//! - [`Bridge::broadcast`] from a timer, every
//! [`Config::broadcast_interval`]. Notifications are handed to a
//! [`Transport`] only while a central is connected.
//!
//! - [`Bridge::connect`] and [`Bridge::disconnect`] from the BLE stack.
//! Disconnecting resets the sensor state.
//!
//! None of these block, and the transport only ever sees encoded copies of
//! the state.

use core::{ops::AddAssign, time::Duration};

use log::{debug, info, warn};

use crate::{
    avec::FrameDecoder,
    command::Command,
    ftms::{Characteristic, encode_indoor_bike_data, status::StatusTracker},
    router::Router,
    sans::frame::{DeviceType, Frame, FrameKind, Revision},
    state::{Aggregator, SensorState},
};

/// Default period between broadcasts.
pub const BROADCAST_INTERVAL: Duration = Duration::from_secs(2);

/// Bridge configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Framing revision of the serial link.
    pub revision: Revision,
    /// Device type assumed for frames without a device type tag.
    pub default_device: DeviceType,
    /// Period the caller's timer should invoke [`Bridge::broadcast`] with.
    pub broadcast_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            revision: Revision::Tagged,
            default_device: DeviceType::FitnessEquipment,
            broadcast_interval: BROADCAST_INTERVAL,
        }
    }
}

/// Receiver of encoded notifications, implemented by the BLE stack.
pub trait Transport {
    fn notify(&mut self, characteristic: Characteristic, data: &[u8]);
}

/// Executor of control commands, such as renaming or rebooting the device.
pub trait Console {
    fn execute(&mut self, command: Command<'_>);
}

/// Counts of what a call to [`Bridge::feed`] received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Feed {
    /// Frames passing validation.
    pub frames: usize,
    /// Frames discarded for a framing error.
    pub rejected: usize,
    /// Sensor frames decoded into a known page.
    pub pages: usize,
    /// Commands handed to the console.
    pub commands: usize,
}

impl AddAssign for Feed {
    fn add_assign(&mut self, rhs: Self) {
        self.frames += rhs.frames;
        self.rejected += rhs.rejected;
        self.pages += rhs.pages;
        self.commands += rhs.commands;
    }
}

/// Translates ANT+ frames into FTMS notifications.
#[derive(Debug)]
pub struct Bridge {
    config: Config,
    decoder: FrameDecoder,
    router: Router,
    aggregator: Aggregator,
    status: StatusTracker,
    connected: bool,
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Bridge {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            decoder: FrameDecoder::new(config.revision),
            router: Router::default(),
            aggregator: Aggregator::new(),
            status: StatusTracker::new(),
            connected: false,
        }
    }

    /// Replace the page dispatch table.
    pub fn with_router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// A copy of the current sensor state.
    pub fn snapshot(&self) -> SensorState {
        self.aggregator.snapshot()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Feed the bytes available from the serial link.
    pub fn feed(&mut self, r: &[u8], console: &mut impl Console) -> Feed {
        let Self {
            config,
            decoder,
            router,
            aggregator,
            ..
        } = self;

        let mut feed = Feed::default();

        for result in decoder.frames(r) {
            match result {
                Ok(frame) => {
                    feed.frames += 1;
                    dispatch(config, router, aggregator, &frame, console, &mut feed);
                }
                Err(_) => feed.rejected += 1,
            }
        }

        feed
    }

    /// Mark a central as connected, enabling broadcasts.
    pub fn connect(&mut self) {
        info!("Central connected, starting broadcasts.");
        self.connected = true;
    }

    /// Mark the central as disconnected, stopping broadcasts and resetting the
    /// sensor state.
    pub fn disconnect(&mut self) {
        info!("Central disconnected, stopping broadcasts.");
        self.connected = false;
        self.aggregator.reset();
        self.status.reset();
    }

    /// Encode the current state and hand the notifications to a transport.
    ///
    /// Indoor Bike Data is sent on every call. Status notifications are
    /// derived and sent only when a page was decoded since the previous
    /// broadcast. Returns whether anything was sent, which is never the case
    /// without a connected central.
    pub fn broadcast(&mut self, transport: &mut impl Transport) -> bool {
        if !self.connected {
            debug!("No central connected, skipping broadcast.");
            return false;
        }

        let snapshot = self.aggregator.snapshot();

        transport.notify(
            Characteristic::IndoorBikeData,
            &encode_indoor_bike_data(&snapshot),
        );

        debug!(
            "Broadcast power {} W, speed {:.2} km/h, cadence {} rpm, distance {} m, resistance {:.1} %, elapsed {} s.",
            snapshot.instantaneous_power,
            snapshot.speed,
            snapshot.cadence,
            snapshot.distance,
            snapshot.resistance,
            snapshot.elapsed_time,
        );

        if self.aggregator.take_new_data() {
            let report = self.status.update(&snapshot);

            for status in report.machine() {
                transport.notify(Characteristic::FitnessMachineStatus, status.encode().as_bytes());
            }

            if let Some(training) = report.training {
                transport.notify(Characteristic::TrainingStatus, &training.encode());
            }
        }

        true
    }
}

fn dispatch(
    config: &Config,
    router: &Router,
    aggregator: &mut Aggregator,
    frame: &Frame,
    console: &mut impl Console,
    feed: &mut Feed,
) {
    match frame.kind() {
        FrameKind::Sensor => {
            let device = frame.device_type().unwrap_or(config.default_device);

            let Some(page) = frame.page() else {
                return;
            };

            if router.route(device, page, aggregator).is_some() {
                feed.pages += 1;
            }
        }
        FrameKind::Command => match Command::parse(frame.payload()) {
            Ok(command) => {
                info!("Executing command {command:?}.");
                feed.commands += 1;
                console.execute(command);
            }
            Err(err) => warn!("Rejecting command: {err}"),
        },
    }
}
