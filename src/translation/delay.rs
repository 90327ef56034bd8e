use rand::Rng;
use std::time::Duration;

/// Random pause between provider calls, uniform over `[min, max]` milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterDelay {
    min: Duration,
    max: Duration,
}

impl JitterDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn sample(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        if min == max {
            return self.min;
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }

    pub async fn wait(&self) -> Duration {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        delay
    }
}
