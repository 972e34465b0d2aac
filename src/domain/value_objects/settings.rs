//! Tunable pipeline settings
//!
//! Every value has a default and can be overridden through a
//! `STORYREEL_*` environment variable.

use std::time::Duration;

/// All configurable pipeline settings
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    // Outline
    pub min_scene_count: usize,

    // Composition
    pub seconds_per_scene: u32,
    pub composition_latency_ms: u64,

    // Narration
    pub narration_duration_secs: u32,

    // Progress estimator
    pub progress_tick_ms: u64,
    pub progress_increment: u8,
    pub progress_ceiling: u8,

    // Pacing applied before a fallback result is shown
    pub fallback_delay_ms: u64,

    // Wizard sessions
    pub wizard_idle_timeout_secs: u64,
    pub wizard_sweep_interval_secs: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            min_scene_count: 5,
            seconds_per_scene: 5,
            composition_latency_ms: 5000,
            narration_duration_secs: 30,
            progress_tick_ms: 200,
            progress_increment: 5,
            progress_ceiling: 95,
            fallback_delay_ms: 0,
            wizard_idle_timeout_secs: 3600,
            wizard_sweep_interval_secs: 300,
        }
    }
}

impl AppSettings {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_scene_count: env_or("STORYREEL_MIN_SCENES", defaults.min_scene_count),
            seconds_per_scene: env_or("STORYREEL_SECONDS_PER_SCENE", defaults.seconds_per_scene),
            composition_latency_ms: env_or("STORYREEL_COMPOSITION_LATENCY_MS", defaults.composition_latency_ms),
            narration_duration_secs: env_or("STORYREEL_NARRATION_DURATION_SECS", defaults.narration_duration_secs),
            progress_tick_ms: env_or("STORYREEL_PROGRESS_TICK_MS", defaults.progress_tick_ms),
            progress_increment: env_or("STORYREEL_PROGRESS_INCREMENT", defaults.progress_increment),
            // 100 is reserved for "finished"
            progress_ceiling: env_or("STORYREEL_PROGRESS_CEILING", defaults.progress_ceiling).min(99),
            fallback_delay_ms: env_or("STORYREEL_FALLBACK_DELAY_MS", defaults.fallback_delay_ms),
            wizard_idle_timeout_secs: env_or("STORYREEL_WIZARD_IDLE_SECS", defaults.wizard_idle_timeout_secs),
            wizard_sweep_interval_secs: env_or(
                "STORYREEL_WIZARD_SWEEP_SECS",
                defaults.wizard_sweep_interval_secs,
            )
            .max(1),
        }
    }

    pub fn composition_latency(&self) -> Duration {
        Duration::from_millis(self.composition_latency_ms)
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms)
    }

    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }

    pub fn wizard_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.wizard_idle_timeout_secs)
    }

    pub fn wizard_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.wizard_sweep_interval_secs)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
