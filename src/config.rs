use confique::Config as DeriveConfig;

use crate::tree::Layout;

/// Layout hints for node position computation. Loaded from `jtree.toml` (or
/// `--config <path>`), with `JTREE_*` environment variables taking
/// precedence.
#[derive(Debug, DeriveConfig)]
pub struct Config {
    /// Horizontal distance between consecutive depths.
    #[config(env = "JTREE_X_GAP", default = 220)]
    pub x_gap: i32,

    /// Vertical distance between consecutive siblings.
    #[config(env = "JTREE_Y_GAP", default = 90)]
    pub y_gap: i32,

    /// Extra vertical offset applied once per depth level.
    #[config(env = "JTREE_DEPTH_NUDGE", default = 10)]
    pub depth_nudge: i32,
}

impl Config {
    pub fn layout(&self) -> Layout {
        Layout {
            x_gap: self.x_gap,
            y_gap: self.y_gap,
            depth_nudge: self.depth_nudge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_layout() {
        let config = Config::builder().load().unwrap();
        assert_eq!(config.x_gap, 220);
        assert_eq!(config.y_gap, 90);
        assert_eq!(config.depth_nudge, 10);

        let layout = config.layout();
        assert_eq!(layout.x_gap, 220);
        assert_eq!(layout.y_gap, 90);
        assert_eq!(layout.depth_nudge, 10);
    }
}
