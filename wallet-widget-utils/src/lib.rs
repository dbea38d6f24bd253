pub use self::address::*;
pub use self::clock::*;
pub use self::serde_helpers::*;

mod address;
mod clock;
mod serde_helpers;
