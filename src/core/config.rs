//! # Global runtime configuration.
//!
//! Provides [`Config`], the centralized settings of a pipeline.
//!
//! All durations are expressed in whole **time units**; [`Config::time_unit`] says how
//! long one unit is. The reference setup uses one-second units, a producer period of
//! [`PRODUCE_CYCLE`] units and a worker duration of [`CONSUME_DURATION`] units.
//!
//! ## Validation
//! [`Config::validate`] rejects values that would turn a wait into a busy loop
//! (zero time unit, zero producer period, zero pop timeout, zero poll interval).
//! `consume_duration = 0` is allowed: the worker then completes instantly.

use std::time::Duration;

use crate::error::ConfigError;
use crate::policies::SkipPolicy;

/// Producer period in time units.
pub const PRODUCE_CYCLE: u32 = 4;

/// Nominal duration of one unit of work in time units.
pub const CONSUME_DURATION: u32 = 2;

/// Global configuration for the pipeline.
///
/// ## Field semantics
/// - `time_unit`: length of one time unit
/// - `produce_cycle`: producer period (units)
/// - `consume_duration`: nominal worker duration per item (units)
/// - `pop_timeout`: how long the consumer waits on an empty queue before re-checking its stop flag (units)
/// - `poll_interval`: how often the main flow re-checks the shutdown flag (units)
/// - `skip`: staleness policy applied by the consumer
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
#[derive(Clone, Debug)]
pub struct Config {
    /// Length of one time unit.
    pub time_unit: Duration,

    /// Producer period, in time units.
    pub produce_cycle: u32,

    /// Worker duration per item, in time units.
    pub consume_duration: u32,

    /// Consumer pop timeout, in time units.
    ///
    /// Bounds how long a consumer blocked on an empty queue takes to notice its stop flag.
    pub pop_timeout: u32,

    /// Main flow poll interval, in time units.
    pub poll_interval: u32,

    /// Staleness policy applied by the consumer after each pop.
    pub skip: SkipPolicy,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages skip older items.
    pub bus_capacity: usize,
}

impl Config {
    /// Producer period as a `Duration`.
    #[inline]
    pub fn period(&self) -> Duration {
        self.units(self.produce_cycle)
    }

    /// Worker duration per item as a `Duration`.
    #[inline]
    pub fn work_duration(&self) -> Duration {
        self.units(self.consume_duration)
    }

    /// Consumer pop timeout as a `Duration`.
    #[inline]
    pub fn pop_timeout(&self) -> Duration {
        self.units(self.pop_timeout)
    }

    /// Main flow poll interval as a `Duration`.
    #[inline]
    pub fn poll_interval(&self) -> Duration {
        self.units(self.poll_interval)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Checks that no configured wait degenerates into a busy loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_unit.is_zero() {
            return Err(ConfigError::ZeroTimeUnit);
        }
        if self.produce_cycle == 0 {
            return Err(ConfigError::ZeroProduceCycle);
        }
        if self.pop_timeout == 0 {
            return Err(ConfigError::ZeroPopTimeout);
        }
        if self.poll_interval == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }

    fn units(&self, n: u32) -> Duration {
        self.time_unit.saturating_mul(n)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `time_unit = 1s`
    /// - `produce_cycle = 4` ([`PRODUCE_CYCLE`])
    /// - `consume_duration = 2` ([`CONSUME_DURATION`])
    /// - `pop_timeout = 1`, `poll_interval = 1`
    /// - `skip = SkipPolicy::CheckAfterPop`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            time_unit: Duration::from_secs(1),
            produce_cycle: PRODUCE_CYCLE,
            consume_duration: CONSUME_DURATION,
            pop_timeout: 1,
            poll_interval: 1,
            skip: SkipPolicy::default(),
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_setup() {
        let cfg = Config::default();
        assert_eq!(cfg.period(), Duration::from_secs(4));
        assert_eq!(cfg.work_duration(), Duration::from_secs(2));
        assert_eq!(cfg.pop_timeout(), Duration::from_secs(1));
        assert_eq!(cfg.poll_interval(), Duration::from_secs(1));
        assert_eq!(cfg.skip, SkipPolicy::CheckAfterPop);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn durations_scale_with_time_unit() {
        let cfg = Config {
            time_unit: Duration::from_millis(10),
            ..Config::default()
        };
        assert_eq!(cfg.period(), Duration::from_millis(40));
        assert_eq!(cfg.work_duration(), Duration::from_millis(20));
    }

    #[test]
    fn validate_rejects_busy_loops() {
        let zero_unit = Config {
            time_unit: Duration::ZERO,
            ..Config::default()
        };
        assert!(matches!(zero_unit.validate(), Err(ConfigError::ZeroTimeUnit)));

        let zero_cycle = Config {
            produce_cycle: 0,
            ..Config::default()
        };
        assert!(matches!(zero_cycle.validate(), Err(ConfigError::ZeroProduceCycle)));

        let zero_pop = Config {
            pop_timeout: 0,
            ..Config::default()
        };
        assert!(matches!(zero_pop.validate(), Err(ConfigError::ZeroPopTimeout)));

        let zero_poll = Config {
            poll_interval: 0,
            ..Config::default()
        };
        assert!(matches!(zero_poll.validate(), Err(ConfigError::ZeroPollInterval)));
    }

    #[test]
    fn instant_worker_is_allowed() {
        let cfg = Config {
            consume_duration: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.work_duration(), Duration::ZERO);
    }
}
