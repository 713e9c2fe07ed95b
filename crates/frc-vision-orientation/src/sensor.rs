use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{bounded, RecvTimeoutError, Sender};
use log::{debug, error, info};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::OrientationError;
use crate::link::{AhrsLink, RtcDate, RtcTime};

/// Poll period used unless overridden with [`OrientationSensor::with_poll_period`].
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(100);

/// Latest values read from the link, published as one unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrientationSnapshot {
    /// Heading in degrees, rounded to two decimals.
    pub angle: f64,
    pub yaw: f64,
    pub pitch: f64,
    pub time: RtcTime,
    pub date: RtcDate,
}

type SharedLink = Arc<Mutex<Box<dyn AhrsLink>>>;

struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// Background poller over an [`AhrsLink`].
pub struct OrientationSensor {
    name: String,
    open: bool,
    poll_period: Duration,
    link: SharedLink,
    latest: Arc<RwLock<OrientationSnapshot>>,
    worker: Mutex<Option<Worker>>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn poll(link: &SharedLink, latest: &RwLock<OrientationSnapshot>) {
    let snapshot = {
        let mut link = link.lock();
        OrientationSnapshot {
            angle: round2(link.angle()),
            yaw: link.yaw(),
            pitch: link.pitch(),
            time: link.rtc_time(),
            date: link.rtc_date(),
        }
    };
    *latest.write() = snapshot;
}

impl OrientationSensor {
    /// Wrap `link`. An open link is reset, its yaw zeroed and the clock read
    /// once; a closed one is reported and the sensor stays stopped.
    pub fn new(name: impl Into<String>, link: impl AhrsLink + 'static) -> Self {
        let name = name.into();
        let mut link: Box<dyn AhrsLink> = Box::new(link);
        let open = link.is_open();

        let mut initial = OrientationSnapshot::default();
        if open {
            link.reset();
            link.zero_yaw();
            initial.time = link.rtc_time();
            initial.date = link.rtc_date();
            info!("orientation sensor {name:?} opened");
        } else {
            error!(
                "orientation sensor {name:?}: unable to open AHRS link. \
                 Is the resource (or what it requires) in use by another process? \
                 Does this process have root privileges?"
            );
        }

        Self {
            name,
            open,
            poll_period: DEFAULT_POLL_PERIOD,
            link: Arc::new(Mutex::new(link)),
            latest: Arc::new(RwLock::new(initial)),
            worker: Mutex::new(None),
        }
    }

    pub fn with_poll_period(mut self, period: Duration) -> Self {
        self.poll_period = period;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn poll_period(&self) -> Duration {
        self.poll_period
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Spawn the polling thread. Does nothing when the link is not open or
    /// the thread is already running.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self), fields(name = %self.name)))]
    pub fn start(&self) -> Result<(), OrientationError> {
        if !self.open {
            debug!("orientation sensor {:?} not open; start ignored", self.name);
            return Ok(());
        }
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return Ok(());
        }

        let (stop_tx, stop_rx) = bounded::<()>(1);
        let link = Arc::clone(&self.link);
        let latest = Arc::clone(&self.latest);
        let period = self.poll_period;

        let handle = thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || loop {
                poll(&link, &latest);
                match stop_rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(|source| OrientationError::Spawn {
                name: self.name.clone(),
                source,
            })?;

        *worker = Some(Worker { stop_tx, handle });
        debug!("orientation sensor {:?} polling every {:?}", self.name, period);
        Ok(())
    }

    /// Stop polling and wait for the thread to exit. Safe to call repeatedly.
    pub fn stop(&self) {
        let Some(Worker { stop_tx, handle }) = self.worker.lock().take() else {
            return;
        };
        let _ = stop_tx.try_send(());
        drop(stop_tx);
        if handle.join().is_err() {
            error!("orientation sensor {:?}: polling thread panicked", self.name);
        }
        debug!("orientation sensor {:?} stopped", self.name);
    }

    /// Copy of the latest published values.
    pub fn snapshot(&self) -> OrientationSnapshot {
        *self.latest.read()
    }

    pub fn read_angle(&self) -> f64 {
        self.latest.read().angle
    }

    pub fn read_yaw(&self) -> f64 {
        self.latest.read().yaw
    }

    pub fn read_pitch(&self) -> f64 {
        self.latest.read().pitch
    }

    pub fn read_time(&self) -> RtcTime {
        self.latest.read().time
    }

    pub fn read_date(&self) -> RtcDate {
        self.latest.read().date
    }

    /// Reset the gyro and zero yaw. Returns `false` when the link is not open.
    pub fn reset_gyro(&self) -> bool {
        if !self.open {
            return false;
        }
        let mut link = self.link.lock();
        link.reset();
        link.zero_yaw();
        true
    }

    pub fn set_time(&self, time: RtcTime) -> bool {
        self.open && self.link.lock().set_rtc_time(time)
    }

    pub fn set_date(&self, date: RtcDate) -> bool {
        self.open && self.link.lock().set_rtc_date(date)
    }
}

impl Drop for OrientationSensor {
    fn drop(&mut self) {
        self.stop();
    }
}
