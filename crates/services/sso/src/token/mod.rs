//! Session token issuing and verification.

mod clock;
mod issuer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use issuer::{Claims, TokenIssuer};
