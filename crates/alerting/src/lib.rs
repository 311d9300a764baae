//! Alerting System
//!
//! The single choke point for user-visible alert effects:
//! - One global cooldown regardless of which detector fired
//! - Full alerts (flash + tone + toast) and passive low-confidence flashes
//! - Fire-and-forget effect channels that never block the frame path

mod clock;
mod dispatcher;
mod effects;
mod tone;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dispatcher::{AlertConfig, AlertDispatcher};
pub use effects::{AlertEffects, ChannelEffects, EffectCommand, FlashColor, RecordingEffects};
pub use tone::{ToneEnvelope, ToneError};
