use std::fmt;

use bitflags::bitflags;

/// One analog input of a two-channel instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Ch1,
    Ch2,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Ch1, Channel::Ch2];

    /// The 1-based number used in the command vocabulary (`CHAN1`, `:CHAN2:SCAL?`).
    pub fn number(self) -> u8 {
        match self {
            Self::Ch1 => 1,
            Self::Ch2 => 2,
        }
    }

    pub fn from_number(number: u8) -> Option<Channel> {
        match number {
            1 => Some(Self::Ch1),
            2 => Some(Self::Ch2),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CHAN{}", self.number())
    }
}

bitflags! {
    /// Channels to capture. The bit values double as the traditional selector: `1`, `2`, or `3`
    /// for both.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChannelSet: u8 {
        const Ch1  = 1<<0;
        const Ch2  = 1<<1;
        const Both = Self::Ch1.bits() | Self::Ch2.bits();
    }
}

impl ChannelSet {
    pub fn from_selector(selector: u8) -> Option<ChannelSet> {
        match ChannelSet::from_bits(selector) {
            Some(set) if !set.is_empty() => Some(set),
            _ => None,
        }
    }

    pub fn has(self, channel: Channel) -> bool {
        self.contains(channel.into())
    }
}

impl From<Channel> for ChannelSet {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Ch1 => ChannelSet::Ch1,
            Channel::Ch2 => ChannelSet::Ch2,
        }
    }
}

impl std::str::FromStr for ChannelSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("both") {
            return Ok(ChannelSet::Both)
        }
        s.parse::<u8>().ok()
            .and_then(ChannelSet::from_selector)
            .ok_or_else(|| format!("invalid channel selector {:?}: expected 1, 2, 3 or both", s))
    }
}
