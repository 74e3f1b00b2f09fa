//! Text overlay layout
//!
//! An [`AnnotationLayout`] is a set of [`AnnotationBox`]es placed by
//! normalised rectangles (0..1 of the client area). Each box asks its
//! [`AnnotationItem`] for the text to show for a given image.

use std::fmt;

use crate::presentation::PresentationImage;
use pixview_core::RectF;

/// Produces the text of one annotation box
pub trait AnnotationItem {
    /// Text to show for `image`; empty text draws nothing
    fn annotation_text(&self, image: &PresentationImage) -> String;
}

/// Fixed text
impl AnnotationItem for String {
    fn annotation_text(&self, _image: &PresentationImage) -> String {
        self.clone()
    }
}

/// Supplies the annotation layout of an image
pub trait AnnotationLayoutProvider {
    fn annotation_layout(&self) -> &AnnotationLayout;
}

/// Horizontal placement of text inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justification {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical placement of text inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    Top,
    #[default]
    Center,
    Bottom,
}

/// What happens to text wider than its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Truncation {
    /// Cut at the last whole character that fits
    Truncate,
    /// Cut and append an ellipsis
    #[default]
    Ellipsis,
}

/// One text box of an annotation layout
pub struct AnnotationBox {
    pub normalized_rectangle: RectF,
    pub number_of_lines: u32,
    pub bold: bool,
    pub italic: bool,
    pub justification: Justification,
    pub vertical_alignment: VerticalAlignment,
    pub truncation: Truncation,
    /// Shrink the font until the text fits the box width
    pub fit_width: bool,
    /// Color name, e.g. "White" or "OrangeRed"
    pub color: String,
    pub font: String,
    pub visible: bool,
    pub item: Option<Box<dyn AnnotationItem>>,
}

impl fmt::Debug for AnnotationBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationBox")
            .field("normalized_rectangle", &self.normalized_rectangle)
            .field("number_of_lines", &self.number_of_lines)
            .field("justification", &self.justification)
            .field("vertical_alignment", &self.vertical_alignment)
            .field("truncation", &self.truncation)
            .field("fit_width", &self.fit_width)
            .field("color", &self.color)
            .field("font", &self.font)
            .field("visible", &self.visible)
            .field("has_item", &self.item.is_some())
            .finish()
    }
}

impl Default for AnnotationBox {
    fn default() -> Self {
        Self {
            normalized_rectangle: RectF::new(0.0, 0.0, 1.0, 1.0),
            number_of_lines: 1,
            bold: false,
            italic: false,
            justification: Justification::default(),
            vertical_alignment: VerticalAlignment::default(),
            truncation: Truncation::default(),
            fit_width: false,
            color: "OrangeRed".to_string(),
            font: "Arial".to_string(),
            visible: true,
            item: None,
        }
    }
}

impl AnnotationBox {
    /// Create a box at `normalized_rectangle` showing `item`
    pub fn new(normalized_rectangle: RectF, item: impl AnnotationItem + 'static) -> Self {
        Self {
            normalized_rectangle,
            item: Some(Box::new(item)),
            ..Self::default()
        }
    }

    pub fn with_lines(mut self, number_of_lines: u32) -> Self {
        self.number_of_lines = number_of_lines;
        self
    }

    pub fn with_style(mut self, bold: bool, italic: bool) -> Self {
        self.bold = bold;
        self.italic = italic;
        self
    }

    pub fn with_justification(mut self, justification: Justification) -> Self {
        self.justification = justification;
        self
    }

    pub fn with_vertical_alignment(mut self, alignment: VerticalAlignment) -> Self {
        self.vertical_alignment = alignment;
        self
    }

    pub fn with_truncation(mut self, truncation: Truncation) -> Self {
        self.truncation = truncation;
        self
    }

    pub fn with_fit_width(mut self, fit_width: bool) -> Self {
        self.fit_width = fit_width;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Text of the box for `image`, empty without an item
    pub fn annotation_text(&self, image: &PresentationImage) -> String {
        self.item
            .as_ref()
            .map(|item| item.annotation_text(image))
            .unwrap_or_default()
    }
}

/// A set of annotation boxes
#[derive(Debug)]
pub struct AnnotationLayout {
    pub visible: bool,
    pub boxes: Vec<AnnotationBox>,
}

impl Default for AnnotationLayout {
    fn default() -> Self {
        Self {
            visible: true,
            boxes: Vec::new(),
        }
    }
}

impl AnnotationLayout {
    pub fn new(boxes: Vec<AnnotationBox>) -> Self {
        Self {
            visible: true,
            boxes,
        }
    }

    /// Visible boxes in layout order
    pub fn visible_boxes(&self) -> impl Iterator<Item = &AnnotationBox> {
        self.boxes.iter().filter(|b| b.visible)
    }
}

impl AnnotationLayoutProvider for AnnotationLayout {
    fn annotation_layout(&self) -> &AnnotationLayout {
        self
    }
}
