pub mod busy;
pub mod secret;
pub mod status;

pub use busy::{BusyFlag, BusyGuard};
pub use secret::{SecretEntry, SecretField};
pub use status::{Status, StatusDisplay, StatusKind};
