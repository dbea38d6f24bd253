pub mod core;
pub mod external;
pub mod models;
pub mod transport;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub mod web;
