//! Font flyweight cache
//!
//! Fonts are shared by reference: every request for the same family,
//! size (to 0.1), style and unit returns the same [`Rc<Font>`]. Only
//! pixel and point sizes are cached. When a miss finds the cache full,
//! the whole cache is flushed before the new font is inserted.

use std::collections::HashMap;
use std::rc::Rc;

use pixview_core::{BuiltinFontSource, Font, FontSource, FontStyle, FontUnit};

/// Cache key: family, size in tenths, style and unit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FontKey {
    family: String,
    tenths: i64,
    style: FontStyle,
    unit: FontUnit,
}

impl FontKey {
    fn new(family: &str, size: f32, style: FontStyle, unit: FontUnit) -> Self {
        Self {
            family: family.to_string(),
            tenths: (size * 10.0).round() as i64,
            style,
            unit,
        }
    }
}

/// Creates and caches fonts
pub struct FontFactory {
    source: Box<dyn FontSource>,
    cache: HashMap<FontKey, Rc<Font>>,
    capacity: usize,
}

impl std::fmt::Debug for FontFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFactory")
            .field("cached", &self.cache.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl Default for FontFactory {
    fn default() -> Self {
        Self::new(50)
    }
}

impl FontFactory {
    /// Create a factory backed by the built-in face
    pub fn new(capacity: usize) -> Self {
        Self::with_source(BuiltinFontSource, capacity)
    }

    /// Create a factory backed by another font source
    pub fn with_source(source: impl FontSource + 'static, capacity: usize) -> Self {
        Self {
            source: Box::new(source),
            cache: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Number of cached fonts
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get a font, creating it on a miss
    ///
    /// If `name` cannot be constructed, `default_name` is tried; if that
    /// fails too, the built-in font is returned. Never fails.
    pub fn create_font(
        &mut self,
        name: &str,
        size: f32,
        style: FontStyle,
        unit: FontUnit,
        default_name: &str,
    ) -> Rc<Font> {
        let size = (size * 10.0).round() / 10.0;
        let cacheable = matches!(unit, FontUnit::Pixel | FontUnit::Point);
        let key = FontKey::new(name, size, style, unit);

        if cacheable && let Some(font) = self.cache.get(&key) {
            return Rc::clone(font);
        }

        let font = Rc::new(self.construct(name, size, style, unit, default_name));
        if cacheable {
            if self.cache.len() >= self.capacity {
                log::trace!("font cache full ({} entries), flushing", self.cache.len());
                self.cache.clear();
            }
            self.cache.insert(key, Rc::clone(&font));
        }
        font
    }

    fn construct(
        &self,
        name: &str,
        size: f32,
        style: FontStyle,
        unit: FontUnit,
        default_name: &str,
    ) -> Font {
        match self.source.create_font(name, size, style, unit) {
            Ok(font) => return font,
            Err(e) => log::warn!("font '{}' unavailable ({}), using '{}'", name, e, default_name),
        }
        match self.source.create_font(default_name, size, style, unit) {
            Ok(font) => font,
            Err(e) => {
                log::warn!(
                    "default font '{}' unavailable ({}), using the built-in face",
                    default_name,
                    e
                );
                Font::builtin(size.max(0.1), style, unit)
            }
        }
    }

    /// Drop every cached font
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
