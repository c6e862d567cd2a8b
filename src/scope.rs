//! Command set of the Rigol DS1000 series two-channel oscilloscopes.

use std::path::Path;

use crate::{Error, Result};
use crate::sys::Driver;
use crate::transport::Transport;
use crate::session::InstrumentSession;
use crate::channel::{Channel, ChannelSet};
use crate::config::Destination;
use crate::waveform::{self, RawWaveform, ScaledWaveform};

/// Upper bound on a `:WAV:DATA?` response for this family, preamble included.
const WAVEFORM_RESPONSE_LENGTH: usize = 9000;
/// Response budget for scale and offset queries.
const NUMBER_RESPONSE_LENGTH: usize = 20;

const CMD_RUN: &str = ":RUN";
const CMD_STOP: &str = ":STOP";
const CMD_FORCE_TRIGGER: &str = ":KEY:FORC";

/// Waveform point mode, see `WAVEFORM:POINTS:MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsMode {
    /// 600 points from the screen.
    Normal,
    /// Full acquisition memory; only in the stopped state.
    Raw,
    /// `Normal` while running, `Raw` while stopped.
    Maximum,
}

impl PointsMode {
    fn keyword(self) -> &'static str {
        match self {
            Self::Normal  => "NORM",
            Self::Raw     => "RAW",
            Self::Maximum => "MAX",
        }
    }

    fn from_keyword(keyword: &str) -> Option<PointsMode> {
        let keyword = keyword.to_ascii_uppercase();
        if keyword.starts_with("NORM") {
            Some(Self::Normal)
        } else if keyword.starts_with("RAW") {
            Some(Self::Raw)
        } else if keyword.starts_with("MAX") {
            Some(Self::Maximum)
        } else {
            None
        }
    }
}

fn response_text(response: &[u8]) -> Option<&str> {
    std::str::from_utf8(response).ok()
        .map(|text| text.trim_matches(|c: char| c.is_whitespace() || c == '\0'))
}

fn parse_number(command: &str, response: Vec<u8>) -> Result<f64> {
    let value = response_text(&response).and_then(|text| text.parse::<f64>().ok());
    match value {
        Some(value) if value.is_finite() => Ok(value),
        _ => Err(Error::MalformedResponse { command: command.to_owned(), response }),
    }
}

/// Unlock the panel, then release the device. Both steps are attempted.
fn release<D: Driver>(mut session: InstrumentSession<D>) -> Result<()> {
    // the force trigger key doubles as "return to local control"
    // TODO: switch to `:KEY:LOCK DIS` once it is confirmed on hardware
    let unlocked = session.write(CMD_FORCE_TRIGGER);
    if let Err(ref error) = unlocked {
        log::warn!("failed to unlock panel: {}", error);
    }
    session.close().and(unlocked)
}

/// A connected oscilloscope.
///
/// Scale and offset values are queried anew for every conversion since the front panel may
/// change them at any time. The acquisition state is likewise never tracked locally.
///
/// Dropping the scope has the same effect as [`Scope::shutdown`], minus the error report.
#[derive(Debug)]
pub struct Scope<D: Driver> {
    session: Option<InstrumentSession<D>>,
    identity: String,
}

impl Scope<crate::sys::imp::UsbtmcDriverImpl> {
    pub fn open(device_path: impl AsRef<Path>) -> Result<Scope<crate::sys::imp::UsbtmcDriverImpl>> {
        Ok(Scope::new(InstrumentSession::new(Transport::open(device_path)?)))
    }

    /// Open the scope, run `f`, and shut the scope down whether or not `f` succeeded.
    pub fn with<T, F>(device_path: impl AsRef<Path>, f: F) -> Result<T>
            where F: FnOnce(&mut Self) -> Result<T> {
        Self::open(device_path)?.scoped(f)
    }
}

impl<D: Driver> Scope<D> {
    pub fn new(mut session: InstrumentSession<D>) -> Scope<D> {
        let identity = session.identify();
        if identity.is_empty() {
            log::warn!("instrument did not identify itself");
        } else {
            log::info!("connected to: {}", identity);
        }
        Scope { session: Some(session), identity }
    }

    pub(crate) fn scoped<T, F>(mut self, f: F) -> Result<T>
            where F: FnOnce(&mut Self) -> Result<T> {
        let result = f(&mut self);
        let shutdown = self.shutdown();
        let value = result?;
        shutdown?;
        Ok(value)
    }

    /// Response to `*IDN?` at connection time; empty if there was none.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The generic request/response session, for commands not covered here.
    pub fn session(&mut self) -> &mut InstrumentSession<D> {
        match self.session.as_mut() {
            Some(session) => session,
            // taken only by `shutdown` and `drop`, both of which consume the scope
            None => unreachable!(),
        }
    }

    pub fn reset(&mut self) -> Result<()> {
        self.session().reset()
    }

    pub fn run(&mut self) -> Result<()> {
        self.session().write(CMD_RUN)
    }

    pub fn stop(&mut self) -> Result<()> {
        self.session().write(CMD_STOP)
    }

    /// Trigger now. This also returns the instrument to front panel control.
    pub fn force_trigger(&mut self) -> Result<()> {
        self.session().write(CMD_FORCE_TRIGGER)
    }

    /// Unlock the front panel keys, by way of [`Scope::force_trigger`].
    pub fn unlock(&mut self) -> Result<()> {
        self.force_trigger()
    }

    pub fn trigger_status(&mut self) -> String {
        let response = self.session().query(":TRIGGER:STATUS?");
        response_text(&response).unwrap_or_default().to_owned()
    }

    /// Not known to have any effect on the DS1000 series.
    pub fn set_wave_points_mode(&mut self, mode: PointsMode) -> Result<()> {
        self.session().write(&format!("WAVEFORM:POINTS:MODE {}", mode.keyword()))
    }

    pub fn wave_points_mode(&mut self) -> Result<PointsMode> {
        let command = "WAVEFORM:POINTS:MODE?";
        let response = self.session().query(command);
        let mode = response_text(&response).and_then(PointsMode::from_keyword);
        mode.ok_or_else(|| Error::MalformedResponse { command: command.to_owned(), response })
    }

    /// Fetch one channel's waveform as sent by the instrument. Empty if nothing arrived.
    pub fn read_waveform(&mut self, channel: Channel) -> RawWaveform {
        let command = format!(":WAV:DATA? {}", channel);
        let data = self.session().query_with_length(&command, WAVEFORM_RESPONSE_LENGTH);
        if data.len() < waveform::PREAMBLE_LENGTH {
            log::warn!("{}: {} bytes, no samples", command, data.len());
        }
        RawWaveform::new(data)
    }

    fn query_number(&mut self, command: &str) -> Result<f64> {
        let response = self.session().query_with_length(command, NUMBER_RESPONSE_LENGTH);
        let value = parse_number(command, response)?;
        log::debug!("{} = {}", command, value);
        Ok(value)
    }

    /// Volts per division.
    pub fn volt_scale(&mut self, channel: Channel) -> Result<f64> {
        self.query_number(&format!(":{}:SCAL?", channel))
    }

    pub fn volt_offset(&mut self, channel: Channel) -> Result<f64> {
        self.query_number(&format!(":{}:OFFS?", channel))
    }

    /// Seconds per division.
    pub fn time_scale(&mut self) -> Result<f64> {
        self.query_number(":TIM:SCAL?")
    }

    pub fn time_offset(&mut self) -> Result<f64> {
        self.query_number(":TIM:OFFS?")
    }

    /// Read a channel and convert it to volts.
    pub fn scaled_waveform(&mut self, channel: Channel) -> Result<Vec<f64>> {
        let raw = self.read_waveform(channel);
        let volt_scale = self.volt_scale(channel)?;
        let volt_offset = self.volt_offset(channel)?;
        Ok(waveform::scale_voltage(raw.samples(), volt_scale, volt_offset))
    }

    /// Time of every screen point, in seconds.
    pub fn time_axis(&mut self) -> Result<Vec<f64>> {
        let time_scale = self.time_scale()?;
        let time_offset = self.time_offset()?;
        Ok(waveform::build_time_axis(time_scale, time_offset))
    }

    /// Capture the selected channels; the others are left as zeros.
    pub fn capture(&mut self, channels: ChannelSet) -> Result<ScaledWaveform> {
        let mut scaled = ScaledWaveform::new(self.time_axis()?);
        for channel in Channel::ALL {
            if channels.has(channel) {
                let data = self.scaled_waveform(channel)?;
                scaled.set_channel(channel, data);
            }
        }
        Ok(scaled)
    }

    pub fn write_waveform(&mut self, destination: &Destination, channels: ChannelSet) -> Result<()> {
        let scaled = self.capture(channels)?;
        scaled.write_to(destination.open()?)?;
        Ok(())
    }

    /// Unlock the front panel, then release the device.
    pub fn shutdown(mut self) -> Result<()> {
        match self.session.take() {
            Some(session) => release(session),
            None => Ok(()),
        }
    }
}

impl<D: Driver> Drop for Scope<D> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("scope dropped without shutdown");
            if let Err(error) = release(session) {
                log::error!("failed to release scope: {}", error);
            }
        }
    }
}
