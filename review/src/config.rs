//! Limits applied to review submissions and rating lookups.

/// Maximum number of distinct product ids accepted by a batch rating lookup.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 100;

/// Maximum length of a review comment, in characters.
pub const DEFAULT_MAX_COMMENT_LEN: usize = 2000;

/// Maximum length of a product id, in characters.
pub const DEFAULT_MAX_PRODUCT_ID_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewConfig {
    pub max_batch_size: usize,
    pub max_comment_len: usize,
    pub max_product_id_len: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            max_comment_len: DEFAULT_MAX_COMMENT_LEN,
            max_product_id_len: DEFAULT_MAX_PRODUCT_ID_LEN,
        }
    }
}

#[derive(Debug)]
pub struct ConfigBuilder {
    config: ReviewConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ReviewConfig::default(),
        }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.max_batch_size = size;
        self
    }

    pub fn comment_len(mut self, len: usize) -> Self {
        self.config.max_comment_len = len;
        self
    }

    pub fn product_id_len(mut self, len: usize) -> Self {
        self.config.max_product_id_len = len;
        self
    }

    pub fn build(self) -> ReviewConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
