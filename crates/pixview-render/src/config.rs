//! Renderer configuration

/// Options for [`SoftwareRenderer`](crate::SoftwareRenderer)
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Resolution at which pen widths and point sizes are nominal
    pub nominal_dpi: f32,
    /// Smallest annotation font size drawn, in pixels
    pub minimum_font_size: f32,
    /// Number of fonts kept before the cache is flushed
    pub font_cache_capacity: usize,
    /// Font used when a requested family cannot be created
    pub default_font: String,
    /// Pixels removed from each side of an annotation box
    pub annotation_inset: i32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            nominal_dpi: 96.0,
            minimum_font_size: 4.0,
            font_cache_capacity: 50,
            default_font: "Arial".to_string(),
            annotation_inset: 4,
        }
    }
}

impl RendererConfig {
    /// Create options with a custom nominal resolution
    pub fn with_nominal_dpi(mut self, dpi: f32) -> Self {
        self.nominal_dpi = dpi;
        self
    }

    /// Create options with a custom minimum annotation font size
    pub fn with_minimum_font_size(mut self, size: f32) -> Self {
        self.minimum_font_size = size;
        self
    }

    /// Create options with a custom font cache capacity
    pub fn with_font_cache_capacity(mut self, capacity: usize) -> Self {
        self.font_cache_capacity = capacity;
        self
    }

    /// Create options with a custom fallback font
    pub fn with_default_font(mut self, name: impl Into<String>) -> Self {
        self.default_font = name.into();
        self
    }

    /// Create options with a custom annotation inset
    pub fn with_annotation_inset(mut self, inset: i32) -> Self {
        self.annotation_inset = inset;
        self
    }

    /// Scale from nominal to actual resolution
    pub fn dpi_scale(&self, dpi: f32) -> f32 {
        dpi / self.nominal_dpi
    }
}
