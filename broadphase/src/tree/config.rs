use crate::error::{BroadphaseError, BroadphaseResult};

#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute margin added on every side of a proxy box.
    pub fat_margin: f32,
    /// Extra margin proportional to the largest extent of the box.
    pub fat_size_ratio: f32,
    /// Scale applied to the last displacement when stretching a box in the direction of travel.
    pub displacement_multiplier: f32,
    /// A stored box reaching more than this many margins past a freshly fattened box is
    /// considered oversized and is shrunk on the next update.
    pub oversize_factor: f32,
    /// Pending removals per live proxy above which a rebuild runs automatically.
    pub rebuild_ratio: f32,
    /// Automatic rebuilds never run below this many pending removals.
    pub rebuild_min_removals: usize,
    pub auto_rebuild: bool,
    /// Nodes reserved up front in the arena.
    pub pool_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fat_margin: 0.1,
            fat_size_ratio: 0.0,
            displacement_multiplier: 2.0,
            oversize_factor: 4.0,
            rebuild_ratio: 0.5,
            rebuild_min_removals: 32,
            auto_rebuild: true,
            pool_size: 0,
        }
    }
}

impl Config {
    /// Fattening switched off; proxies store exactly the geometric box.
    pub fn tight() -> Self {
        Config {
            fat_margin: 0.0,
            fat_size_ratio: 0.0,
            displacement_multiplier: 0.0,
            ..Config::default()
        }
    }

    pub fn validate(&self) -> BroadphaseResult<()> {
        let fields = [
            ("fat_margin", self.fat_margin),
            ("fat_size_ratio", self.fat_size_ratio),
            ("displacement_multiplier", self.displacement_multiplier),
            ("oversize_factor", self.oversize_factor),
            ("rebuild_ratio", self.rebuild_ratio),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(BroadphaseError::InvalidConfig { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(Config::default().validate().is_ok());
        assert!(Config::tight().validate().is_ok());
    }

    #[test]
    fn negative_margin_is_rejected() {
        let config = Config {
            fat_margin: -1.0,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(BroadphaseError::InvalidConfig {
                field: "fat_margin",
                value: -1.0
            })
        );
    }
}
