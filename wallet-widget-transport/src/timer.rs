use std::time::Duration;

use wallet_widget::external::Timer;

#[derive(Debug, Copy, Clone, Default)]
pub struct TokioTimer;

#[cfg_attr(not(feature = "non_threadsafe"), async_trait::async_trait)]
#[cfg_attr(feature = "non_threadsafe", async_trait::async_trait(?Send))]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await
    }
}
