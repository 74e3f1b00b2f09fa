//! Presentation images

use std::fmt;

use crate::annotation::{AnnotationLayout, AnnotationLayoutProvider};
use crate::graphic::Graphic;

/// A scene graph ready to be drawn, with an optional text overlay
pub struct PresentationImage {
    scene_graph: Graphic,
    layout_provider: Option<Box<dyn AnnotationLayoutProvider>>,
}

impl fmt::Debug for PresentationImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationImage")
            .field("scene_graph", &self.scene_graph)
            .field("has_layout_provider", &self.layout_provider.is_some())
            .finish()
    }
}

impl PresentationImage {
    pub fn new(scene_graph: Graphic) -> Self {
        Self {
            scene_graph,
            layout_provider: None,
        }
    }

    pub fn with_layout_provider(
        mut self,
        provider: impl AnnotationLayoutProvider + 'static,
    ) -> Self {
        self.layout_provider = Some(Box::new(provider));
        self
    }

    pub fn scene_graph(&self) -> &Graphic {
        &self.scene_graph
    }

    pub fn scene_graph_mut(&mut self) -> &mut Graphic {
        &mut self.scene_graph
    }

    /// The annotation layout, when the image has a provider
    pub fn annotation_layout(&self) -> Option<&AnnotationLayout> {
        self.layout_provider
            .as_ref()
            .map(|provider| provider.annotation_layout())
    }
}
