//! Control command: yaw, pitch, throttle and trim.

/// Number of bytes in a host frame and in a packet payload.
pub const FRAME_LEN: usize = 4;

/// Largest value a control field carries in its low seven bits.
pub const FIELD_MAX: u8 = 127;

/// Throttle bit 7, repurposed as the channel select flag.
const CHANNEL_FLAG: u8 = 1 << 7;

/// Which receiver channel a packet addresses.
///
/// The channel is carried in the high bit of the throttle byte.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelSelect {
    /// Throttle bit 7 clear.
    #[default]
    A,
    /// Throttle bit 7 set.
    B,
}

/// One four-channel control command.
///
/// Field order on the wire and on the host link is always
/// `[yaw, pitch, throttle, trim]`.
///
/// Yaw, pitch and trim are intended to stay within `0..=127` so their bit 7
/// goes out as zero. Throttle's bit 7 is the [`ChannelSelect`] flag and is up
/// to the caller. Bytes built with [`Command::from_frame`] are not checked:
/// a host that sends larger values gets them transmitted as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    pub yaw: u8,
    pub pitch: u8,
    pub throttle: u8,
    pub trim: u8,
}

impl Command {
    /// Sticks centered, throttle stopped, trim centered.
    pub const NEUTRAL: Self = Self {
        yaw: 63,
        pitch: 63,
        throttle: 0,
        trim: 63,
    };

    /// Build a command with every field masked to seven bits.
    ///
    /// The result always addresses [`ChannelSelect::A`].
    #[must_use]
    pub const fn new(yaw: u8, pitch: u8, throttle: u8, trim: u8) -> Self {
        Self {
            yaw: yaw & FIELD_MAX,
            pitch: pitch & FIELD_MAX,
            throttle: throttle & FIELD_MAX,
            trim: trim & FIELD_MAX,
        }
    }

    /// Take a raw host frame as-is, without validation.
    #[inline]
    #[must_use]
    pub const fn from_frame(frame: [u8; FRAME_LEN]) -> Self {
        Self {
            yaw: frame[0],
            pitch: frame[1],
            throttle: frame[2],
            trim: frame[3],
        }
    }

    /// Payload bytes in transmission order.
    #[inline]
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; FRAME_LEN] {
        [self.yaw, self.pitch, self.throttle, self.trim]
    }

    /// Return a copy addressing the given channel.
    #[must_use]
    pub const fn with_channel(mut self, channel: ChannelSelect) -> Self {
        self.throttle = match channel {
            ChannelSelect::A => self.throttle & !CHANNEL_FLAG,
            ChannelSelect::B => self.throttle | CHANNEL_FLAG,
        };
        self
    }

    /// Channel flag currently carried in the throttle byte.
    #[inline]
    #[must_use]
    pub const fn channel(&self) -> ChannelSelect {
        if self.throttle & CHANNEL_FLAG == 0 {
            ChannelSelect::A
        } else {
            ChannelSelect::B
        }
    }
}

impl Default for Command {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl From<[u8; FRAME_LEN]> for Command {
    fn from(frame: [u8; FRAME_LEN]) -> Self {
        Self::from_frame(frame)
    }
}

impl From<Command> for [u8; FRAME_LEN] {
    fn from(command: Command) -> Self {
        command.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_bytes() {
        assert_eq!(Command::NEUTRAL.to_bytes(), [0x3F, 0x3F, 0x00, 0x3F]);
        assert_eq!(Command::default(), Command::NEUTRAL);
    }

    #[test]
    fn test_from_frame_keeps_order_and_high_bits() {
        let command = Command::from_frame([200, 1, 0x85, 255]);
        assert_eq!(command.yaw, 200);
        assert_eq!(command.pitch, 1);
        assert_eq!(command.throttle, 0x85);
        assert_eq!(command.trim, 255);
        assert_eq!(command.to_bytes(), [200, 1, 0x85, 255]);
    }

    #[test]
    fn test_new_masks_to_seven_bits() {
        let command = Command::new(0xFF, 0x80, 0xC0, 127);
        assert_eq!(command.to_bytes(), [0x7F, 0x00, 0x40, 0x7F]);
        assert_eq!(command.channel(), ChannelSelect::A);
    }

    #[test]
    fn test_channel_flag() {
        let command = Command::new(63, 63, 100, 63).with_channel(ChannelSelect::B);
        assert_eq!(command.throttle, 100 | 0x80);
        assert_eq!(command.channel(), ChannelSelect::B);

        let back = command.with_channel(ChannelSelect::A);
        assert_eq!(back.throttle, 100);
        assert_eq!(back.channel(), ChannelSelect::A);
    }
}
