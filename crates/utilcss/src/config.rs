//! Compiler configuration.

use std::time::Duration;

use ucss::ColorUtilities;

const DEFAULT_LAYER: &str = "utilities";
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(100);
const DEFAULT_CACHE_CAPACITY: usize = 32;
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Settings for a [`Compiler`](crate::Compiler).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use utilcss::CompilerConfig;
///
/// let config = CompilerConfig::default()
///     .with_layer_name("app")
///     .with_min_interval(Duration::from_millis(250));
///
/// assert_eq!(config.layer_name, "app");
/// assert_eq!(config.cache_capacity, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Name of the `@layer` wrapping every generated rule.
    pub layer_name: String,
    /// Calls arriving sooner than this after the last pass started are skipped.
    pub min_interval: Duration,
    /// Entries kept by the default in-memory cache.
    pub cache_capacity: usize,
    /// Age after which a cached entry counts as a miss.
    pub cache_ttl: Duration,
    /// Utilities each color variable generates.
    pub color_utilities: ColorUtilities,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            layer_name: DEFAULT_LAYER.to_string(),
            min_interval: DEFAULT_MIN_INTERVAL,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_ttl: DEFAULT_CACHE_TTL,
            color_utilities: ColorUtilities::default(),
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer_name(mut self, name: impl Into<String>) -> Self {
        self.layer_name = name.into();
        self
    }

    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    /// Sets the in-memory cache bound. Zero is raised to one.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity.max(1);
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_color_utilities(mut self, colors: ColorUtilities) -> Self {
        self.color_utilities = colors;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.layer_name, "utilities");
        assert_eq!(config.min_interval, Duration::from_millis(100));
        assert_eq!(config.cache_ttl, Duration::from_secs(604_800));
        assert_eq!(config.color_utilities, ColorUtilities::all());
    }

    #[test]
    fn zero_capacity_is_raised() {
        assert_eq!(CompilerConfig::new().with_cache_capacity(0).cache_capacity, 1);
    }
}
