//! Print payload options.

/// Options applied to a whole print job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// Printer-wide heat density sent once after init (0-255).
    ///
    /// This is the device setting, independent of the per-pixel threshold
    /// maps used when binarizing.
    pub density: u8,

    /// Lines fed after each printed copy.
    pub feed_lines: u8,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            density: 127,
            feed_lines: 3,
        }
    }
}

impl PrintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set printer density.
    pub fn with_density(mut self, val: u8) -> Self {
        self.density = val;
        self
    }

    /// Builder: set feed lines after each copy.
    pub fn with_feed_lines(mut self, val: u8) -> Self {
        self.feed_lines = val;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = PrintOptions::default();
        assert_eq!(opts.density, 127);
        assert_eq!(opts.feed_lines, 3);
    }

    #[test]
    fn test_builder_chain() {
        let opts = PrintOptions::new().with_density(200).with_feed_lines(0);
        assert_eq!(opts.density, 200);
        assert_eq!(opts.feed_lines, 0);
    }
}
