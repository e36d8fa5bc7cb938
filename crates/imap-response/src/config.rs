//! Parser and reader configuration.

/// Default maximum length of a single response line, in bytes.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// Default maximum size of a single literal, in bytes.
pub const DEFAULT_MAX_LITERAL_SIZE: usize = 64 * 1024 * 1024;

/// Options controlling FETCH post-processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Convert parsed timestamps to the local offset.
    ///
    /// When false, timestamps keep the offset the server sent.
    pub normalise_times: bool,
    /// Key FETCH results by UID when the response carries one.
    pub uid_is_key: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            normalise_times: true,
            uid_is_key: true,
        }
    }
}

impl ParseOptions {
    /// Creates options with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an options builder.
    #[must_use]
    pub fn builder() -> ParseOptionsBuilder {
        ParseOptionsBuilder::default()
    }
}

/// Builder for [`ParseOptions`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptionsBuilder {
    options: ParseOptions,
}

impl ParseOptionsBuilder {
    /// Sets whether timestamps are converted to the local offset.
    #[must_use]
    pub const fn normalise_times(mut self, normalise: bool) -> Self {
        self.options.normalise_times = normalise;
        self
    }

    /// Sets whether FETCH results are keyed by UID.
    #[must_use]
    pub const fn uid_is_key(mut self, uid_is_key: bool) -> Self {
        self.options.uid_is_key = uid_is_key;
        self
    }

    /// Builds the options.
    #[must_use]
    pub const fn build(self) -> ParseOptions {
        self.options
    }
}

/// Limits applied by the framed reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Maximum length of one line, excluding CRLF.
    pub max_line_length: usize,
    /// Maximum announced literal size.
    pub max_literal_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_literal_size: DEFAULT_MAX_LITERAL_SIZE,
        }
    }
}

impl ReaderConfig {
    /// Sets the maximum line length.
    #[must_use]
    pub const fn max_line_length(mut self, limit: usize) -> Self {
        self.max_line_length = limit;
        self
    }

    /// Sets the maximum literal size.
    #[must_use]
    pub const fn max_literal_size(mut self, limit: usize) -> Self {
        self.max_literal_size = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_defaults() {
        let options = ParseOptions::new();
        assert!(options.normalise_times);
        assert!(options.uid_is_key);
    }

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::builder()
            .normalise_times(false)
            .uid_is_key(false)
            .build();

        assert!(!options.normalise_times);
        assert!(!options.uid_is_key);
    }

    #[test]
    fn test_reader_config() {
        let config = ReaderConfig::default().max_line_length(100);
        assert_eq!(config.max_line_length, 100);
        assert_eq!(config.max_literal_size, DEFAULT_MAX_LITERAL_SIZE);
    }
}
