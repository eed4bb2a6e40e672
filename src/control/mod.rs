//! Control-law building blocks: the state vocabulary and the alarm
//! hysteresis band used by [`ControlEngine`](crate::app::service::ControlEngine).

pub mod hysteresis;
pub mod state;

pub use hysteresis::HysteresisBand;
pub use state::{ActuatorState, AlarmState, ControlMode, Reading, Snapshot};
