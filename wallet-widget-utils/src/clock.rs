use std::time::Duration;

/// Time source used for transient UI state (e.g. the "copied" indicator)
pub trait Clock: Send + Sync {
    fn now_ms_u64(&self) -> u64;

    /// Deadline `duration` from now, in milliseconds
    fn deadline_after(&self, duration: Duration) -> u64 {
        self.now_ms_u64()
            .saturating_add(duration.as_millis().min(u64::MAX as u128) as u64)
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct SimpleClock;

impl Clock for SimpleClock {
    #[inline]
    fn now_ms_u64(&self) -> u64 {
        now_ms_u64()
    }
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub fn now_ms_u64() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub fn now_ms_u64() -> u64 {
    use std::time::SystemTime;

    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    duration.as_secs() * 1000 + duration.subsec_millis() as u64
}
