use std::sync::Arc;

use chrono::{NaiveDate, Weekday};
use hub_calendar::{CategorySet, Month, MonthGrid};

pub struct Config {
    pub enabled: bool,
    pub capacity: usize,
}

/// Everything a month grid depends on besides the (immutable) event store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridKey {
    pub month: Month,
    pub active: CategorySet,
    pub today: NaiveDate,
    pub week_start: Weekday,
}

pub struct GridCache {
    enabled: bool,
    inner: quick_cache::sync::Cache<GridKey, Arc<MonthGrid>>,
}

impl GridCache {
    pub fn new(config: Config) -> Self {
        Self {
            enabled: config.enabled,
            inner: quick_cache::sync::Cache::new(config.capacity.max(1)),
        }
    }

    pub fn get_or_build<F>(&self, key: GridKey, build: F) -> Arc<MonthGrid>
    where
        F: FnOnce() -> MonthGrid,
    {
        if !self.enabled {
            return Arc::new(build());
        }

        if let Some(grid) = self.inner.get(&key) {
            log::debug!("Month grid cache hit for {}", key.month);
            return grid;
        }

        let grid = Arc::new(build());
        self.inner.insert(key, Arc::clone(&grid));
        grid
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}
