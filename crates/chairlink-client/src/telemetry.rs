//! Telemetry provider capability
//!
//! Kept separate from the dispatch path: telemetry is cosmetic and must
//! never gate or delay a command.

use async_trait::async_trait;

use chairlink_core::{TelemetryReading, TransportError, MAX_SIGNAL_BARS};

/// Source of battery/signal readings the controller may poll.
#[async_trait]
pub trait TelemetryProvider: Send + Sync {
    async fn sample(&self) -> Result<TelemetryReading, TransportError>;
}

/// Fixed-value provider, used until the device grows real telemetry.
#[derive(Debug, Clone, Copy)]
pub struct StaticTelemetry {
    reading: TelemetryReading,
}

impl StaticTelemetry {
    pub fn new(reading: TelemetryReading) -> Self {
        Self { reading }
    }
}

impl Default for StaticTelemetry {
    fn default() -> Self {
        Self::new(TelemetryReading {
            battery_percent: 0,
            signal_bars: MAX_SIGNAL_BARS,
        })
    }
}

#[async_trait]
impl TelemetryProvider for StaticTelemetry {
    async fn sample(&self) -> Result<TelemetryReading, TransportError> {
        Ok(self.reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_provider_always_answers() {
        let provider = StaticTelemetry::new(TelemetryReading {
            battery_percent: 73,
            signal_bars: 3,
        });
        let reading = provider.sample().await.unwrap();
        assert_eq!(reading.battery_percent, 73);
        assert_eq!(reading.signal_bars, 3);
    }
}
