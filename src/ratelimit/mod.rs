//! Rate limiting gate and window configuration.

mod gate;
mod window;

pub use gate::{RateLimitedGate, SlotPermit};
pub use window::WindowUnit;
