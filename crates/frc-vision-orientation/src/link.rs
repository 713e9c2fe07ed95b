use serde::{Deserialize, Serialize};

/// Real-time clock time of day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtcTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl RtcTime {
    pub fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }
}

/// Real-time clock date. `weekday` follows the hardware's numbering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtcDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub weekday: u8,
}

impl RtcDate {
    pub fn new(year: u16, month: u8, day: u8, weekday: u8) -> Self {
        Self {
            year,
            month,
            day,
            weekday,
        }
    }
}

/// Hardware link to an AHRS board with a real-time clock.
///
/// Angles are in degrees. The link is shared between the polling thread and
/// the caller behind a mutex, so implementations need not be `Sync`.
pub trait AhrsLink: Send {
    /// Whether the hardware was opened successfully.
    fn is_open(&self) -> bool;

    /// Accumulated heading; not wrapped to +-180.
    fn angle(&mut self) -> f64;
    fn yaw(&mut self) -> f64;
    fn pitch(&mut self) -> f64;

    fn reset(&mut self);
    fn zero_yaw(&mut self);

    fn rtc_time(&mut self) -> RtcTime;
    fn rtc_date(&mut self) -> RtcDate;
    fn set_rtc_time(&mut self, time: RtcTime) -> bool;
    fn set_rtc_date(&mut self, date: RtcDate) -> bool;
}

/// Link used when no AHRS hardware is present. Never open.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisconnectedAhrs;

impl AhrsLink for DisconnectedAhrs {
    fn is_open(&self) -> bool {
        false
    }

    fn angle(&mut self) -> f64 {
        0.0
    }

    fn yaw(&mut self) -> f64 {
        0.0
    }

    fn pitch(&mut self) -> f64 {
        0.0
    }

    fn reset(&mut self) {}

    fn zero_yaw(&mut self) {}

    fn rtc_time(&mut self) -> RtcTime {
        RtcTime::default()
    }

    fn rtc_date(&mut self) -> RtcDate {
        RtcDate::default()
    }

    fn set_rtc_time(&mut self, _time: RtcTime) -> bool {
        false
    }

    fn set_rtc_date(&mut self, _date: RtcDate) -> bool {
        false
    }
}
