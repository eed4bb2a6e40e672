//! Publish/subscribe vocabulary and the glue around the broker.
//!
//! | Channel          | Topic                      | Dir | Payloads                        |
//! |------------------|----------------------------|-----|---------------------------------|
//! | `Temperature`    | `industrial/temperature`   | out | `"23.40"`                       |
//! | `Humidity`       | `industrial/humidity`      | out | `"41.20"`                       |
//! | `Alert`          | `industrial/alert`         | out | `HIGH_TEMP_ALERT` / `TEMP_NORMAL` |
//! | `CoolingStatus`  | `industrial/status/servo`  | out | `ACTIVE` / `INACTIVE`           |
//! | `ModeStatus`     | `industrial/status/mode`   | out | `AUTO` / `MANUAL`               |
//! | `CoolingCommand` | `industrial/control/servo` | in  | `ON` / `OFF`                    |
//! | `ModeCommand`    | `industrial/control/mode`  | in  | `AUTO` / `MANUAL`               |
//!
//! Status and command topics are distinct, so a retained status never
//! echoes back as a command.

pub mod dispatch;
pub mod inbox;
pub mod publisher;

pub use inbox::{InboundMessage, Inbox};

/// Logical pub/sub channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Temperature,
    Humidity,
    Alert,
    CoolingStatus,
    ModeStatus,
    CoolingCommand,
    ModeCommand,
}

impl Channel {
    /// Channels the device subscribes to.
    pub const SUBSCRIPTIONS: [Self; 2] = [Self::CoolingCommand, Self::ModeCommand];

    const ALL: [Self; 7] = [
        Self::Temperature,
        Self::Humidity,
        Self::Alert,
        Self::CoolingStatus,
        Self::ModeStatus,
        Self::CoolingCommand,
        Self::ModeCommand,
    ];

    /// Broker topic for this channel.
    pub const fn topic(self) -> &'static str {
        match self {
            Self::Temperature => "industrial/temperature",
            Self::Humidity => "industrial/humidity",
            Self::Alert => "industrial/alert",
            Self::CoolingStatus => "industrial/status/servo",
            Self::ModeStatus => "industrial/status/mode",
            Self::CoolingCommand => "industrial/control/servo",
            Self::ModeCommand => "industrial/control/mode",
        }
    }

    /// Reverse lookup; exact match only.
    pub fn from_topic(topic: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.topic() == topic)
    }

    /// Whether the device accepts commands on this channel.
    pub fn is_inbound(self) -> bool {
        Self::SUBSCRIPTIONS.contains(&self)
    }
}
