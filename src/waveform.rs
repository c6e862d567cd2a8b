//! Conversion of raw waveform bytes into calibrated voltage and time series.
//!
//! The constants encode display conventions of the DS1000 family determined by experiment: the
//! vertical display range covers byte values 30..=229 (inverted), centered on 130, with 25 counts
//! per division; the horizontal display is 600 samples wide with 50 samples per division.

use std::io::{self, Write};

/// Non-sample header preceding the data of every `:WAV:DATA?` response.
pub const PREAMBLE_LENGTH: usize = 10;

/// Number of points in a screen-width waveform.
pub const SAMPLE_COUNT: usize = 600;

const DISPLAY_CENTER: f64 = 130.0;
const COUNTS_PER_DIVISION: f64 = 25.0;
const TIME_CENTER: f64 = 300.0;
const SAMPLES_PER_DIVISION: f64 = 50.0;

/// One channel's `:WAV:DATA?` response, preamble included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawWaveform {
    data: Vec<u8>,
}

impl RawWaveform {
    pub fn new(data: Vec<u8>) -> RawWaveform {
        RawWaveform { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn samples(&self) -> &[u8] {
        decode(&self.data)
    }
}

/// Skip the preamble. A response shorter than the preamble has no samples.
pub fn decode(raw: &[u8]) -> &[u8] {
    raw.get(PREAMBLE_LENGTH..).unwrap_or(&[])
}

/// Convert samples to volts using the channel's vertical scale (volts per division) and offset.
///
/// The instrument reports samples upside down, hence the inversion before the affine transform.
pub fn scale_voltage(samples: &[u8], volt_scale: f64, volt_offset: f64) -> Vec<f64> {
    samples.iter().map(|&sample| {
        let inverted = (255 - sample) as f64;
        (inverted - DISPLAY_CENTER - volt_offset / volt_scale * COUNTS_PER_DIVISION)
            / COUNTS_PER_DIVISION * volt_scale
    }).collect()
}

/// Time of each of the [`SAMPLE_COUNT`] screen points, in seconds, centered on the trigger.
///
/// `_time_offset` is accepted so the call mirrors [`scale_voltage`], but the horizontal offset
/// is not applied: the axis is always symmetric about zero.
pub fn build_time_axis(time_scale: f64, _time_offset: f64) -> Vec<f64> {
    let timespan = TIME_CENTER / SAMPLES_PER_DIVISION * time_scale;
    linspace(-timespan, timespan, SAMPLE_COUNT)
}

fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            let mut points = (0..count).map(|index| start + index as f64 * step).collect::<Vec<_>>();
            points[count - 1] = stop;
            points
        }
    }
}

/// Time axis plus both channel columns, always of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledWaveform {
    pub time: Vec<f64>,
    pub channel1: Vec<f64>,
    pub channel2: Vec<f64>,
}

impl ScaledWaveform {
    /// Both channels zero-filled.
    pub fn new(time: Vec<f64>) -> ScaledWaveform {
        let channel1 = vec![0.0; time.len()];
        let channel2 = vec![0.0; time.len()];
        ScaledWaveform { time, channel1, channel2 }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Replace one channel column; extra values are dropped and missing ones read as zero.
    pub fn set_channel(&mut self, channel: crate::Channel, mut data: Vec<f64>) {
        if data.len() != self.time.len() {
            log::warn!("{} has {} samples, expected {}", channel, data.len(), self.time.len());
        }
        data.resize(self.time.len(), 0.0);
        match channel {
            crate::Channel::Ch1 => self.channel1 = data,
            crate::Channel::Ch2 => self.channel2 = data,
        }
    }

    /// Write the tab-separated table. Anything that is not data is prefixed with `#`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "# Time     \tChannel 1\tChannel 2")?;
        for ((&time, &ch1), &ch2) in self.time.iter().zip(&self.channel1).zip(&self.channel2) {
            // time resolution is 1/600 => 5 significant figures, voltage 1/255 => 4
            writeln!(writer, "{}\t{}\t{}", exponential(time, 4), exponential(ch1, 3), exponential(ch2, 3))?;
        }
        writer.flush()
    }
}

/// Format like C's `%.*e`: signed exponent of at least two digits.
fn exponential(value: f64, precision: usize) -> String {
    let formatted = format!("{:.*e}", precision, value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => formatted, // inf, NaN
    }
}
