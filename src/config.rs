/// Strings with fewer distinct values than this render as `t.Literal[...]`
pub const DEFAULT_ENUM_THRESHOLD: usize = 10;

/// Name bound to the root type in the generated module
pub const DEFAULT_ROOT_NAME: &str = "RootType";

/// Decoder used for input lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonBackend {
    #[default]
    SerdeJson,
    Simd,
}

/// Configuration for building the type model
#[derive(Debug, Clone)]
pub struct InferConfig {
    /// Maximum number of distinct string values retained per position.
    /// `None` keeps every value.
    ///
    /// An overflowed histogram always renders as `str`, so a limit below
    /// [`RenderConfig::enum_threshold`] turns literals into `str` early. Use
    /// [`InferConfig::bounded_by`] to keep the two in step.
    pub value_limit: Option<usize>,

    pub backend: JsonBackend,
}

impl Default for InferConfig {
    fn default() -> Self {
        InferConfig {
            value_limit: None,
            backend: JsonBackend::SerdeJson,
        }
    }
}

impl InferConfig {
    /// Retain only as many distinct values as `render` needs to choose
    /// between `t.Literal` and `str`
    #[must_use]
    pub fn bounded_by(render: &RenderConfig) -> Self {
        InferConfig::default().with_value_limit(Some(render.enum_threshold))
    }

    #[must_use]
    pub fn with_value_limit(mut self, limit: Option<usize>) -> Self {
        self.value_limit = limit;
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: JsonBackend) -> Self {
        self.backend = backend;
        self
    }
}

/// Configuration for rendering the type model as Python source
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub enum_threshold: usize,

    pub root_name: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            enum_threshold: DEFAULT_ENUM_THRESHOLD,
            root_name: String::from(DEFAULT_ROOT_NAME),
        }
    }
}

impl RenderConfig {
    #[must_use]
    pub fn with_enum_threshold(mut self, threshold: usize) -> Self {
        self.enum_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keeps_every_value() {
        assert_eq!(InferConfig::default().value_limit, None);
    }

    #[test]
    fn test_bounded_by_follows_threshold() {
        let render = RenderConfig::default().with_enum_threshold(25);
        let config = InferConfig::bounded_by(&render).with_backend(JsonBackend::Simd);
        assert_eq!(config.value_limit, Some(25));
        assert_eq!(config.backend, JsonBackend::Simd);
    }
}
