use crate::domain::ports::Throttle;
use async_trait::async_trait;
use std::time::Duration;

/// 每次呼叫上游後固定等待
#[derive(Debug, Clone, Copy)]
pub struct FixedCooldown {
    period: Duration,
}

impl FixedCooldown {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

#[async_trait]
impl Throttle for FixedCooldown {
    async fn cooldown(&self) {
        if !self.period.is_zero() {
            tracing::debug!("⏳ Cooling down for {:?}", self.period);
            tokio::time::sleep(self.period).await;
        }
    }
}

/// 測試用：不等待
#[derive(Debug, Clone, Copy, Default)]
pub struct NoThrottle;

#[async_trait]
impl Throttle for NoThrottle {
    async fn cooldown(&self) {}
}
