//! Double-buffered rendering surface
//!
//! A [`RenderingSurface`] belongs to one host window. It owns two
//! canvases the size of the client rectangle:
//!
//! - the image buffer, which receives resampled image pixels
//! - the final buffer, onto which the image buffer and all vector
//!   graphics are composed
//!
//! Both are allocated on first use and dropped when the client size
//! changes. Presenting copies the final buffer into the in-memory screen
//! buffer, which stands in for the host window.

use std::fmt;

use crate::error::{Error, Result};
use pixview_core::{Canvas, PixelBuffer, Rect};

/// Opaque host window handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Opaque host drawing context handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContextId(pub u64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Per-window pair of off-screen buffers plus the presented frame
#[derive(Debug)]
pub struct RenderingSurface {
    window_id: WindowId,
    context_id: ContextId,
    client_rectangle: Rect,
    clip_rectangle: Rect,
    image_buffer: Option<Canvas>,
    final_buffer: Option<Canvas>,
    screen: Option<PixelBuffer>,
    disposed: bool,
}

impl RenderingSurface {
    /// Create a surface for a window with a client area of `width x height`
    ///
    /// Negative sizes are treated as empty.
    pub fn new(window_id: WindowId, width: i32, height: i32) -> Self {
        Self {
            window_id,
            context_id: ContextId::default(),
            client_rectangle: Rect::from_size(width.max(0), height.max(0)),
            clip_rectangle: Rect::default(),
            image_buffer: None,
            final_buffer: None,
            screen: None,
            disposed: false,
        }
    }

    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    pub fn context_id(&self) -> ContextId {
        self.context_id
    }

    pub fn set_context_id(&mut self, context_id: ContextId) {
        self.context_id = context_id;
    }

    pub fn client_rectangle(&self) -> Rect {
        self.client_rectangle
    }

    /// Set the client area; a size change drops both buffers
    ///
    /// The rectangle is re-based to the origin.
    pub fn set_client_rectangle(&mut self, rect: Rect) {
        let rect = Rect::from_size(rect.w.max(0), rect.h.max(0));
        if rect == self.client_rectangle {
            return;
        }
        log::debug!(
            "window {}: client rectangle {} -> {}, dropping buffers",
            self.window_id,
            self.client_rectangle,
            rect
        );
        self.client_rectangle = rect;
        self.image_buffer = None;
        self.final_buffer = None;
    }

    /// Region presented by [`render_to_screen`](Self::render_to_screen);
    /// an empty clip presents the whole client area
    pub fn clip_rectangle(&self) -> Rect {
        self.clip_rectangle
    }

    pub fn set_clip_rectangle(&mut self, rect: Rect) {
        self.clip_rectangle = rect;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn check_alive(&self) -> Result<()> {
        if self.disposed {
            return Err(Error::SurfaceDisposed(self.window_id));
        }
        Ok(())
    }

    /// Return the canvas in `slot`, allocating it at `rect` if missing
    fn ensure<'a>(
        slot: &'a mut Option<Canvas>,
        window_id: WindowId,
        rect: Rect,
        name: &str,
    ) -> Result<&'a mut Canvas> {
        let canvas = match slot.take() {
            Some(canvas) => canvas,
            None => {
                log::debug!(
                    "window {}: allocating {} buffer {}x{}",
                    window_id,
                    name,
                    rect.w,
                    rect.h
                );
                Canvas::new(rect.w, rect.h)?
            }
        };
        Ok(slot.insert(canvas))
    }

    /// The image buffer, allocated on first use
    pub fn image_buffer(&mut self) -> Result<&mut Canvas> {
        self.check_alive()?;
        Self::ensure(
            &mut self.image_buffer,
            self.window_id,
            self.client_rectangle,
            "image",
        )
    }

    /// The final buffer, allocated on first use
    pub fn final_buffer(&mut self) -> Result<&mut Canvas> {
        self.check_alive()?;
        Self::ensure(
            &mut self.final_buffer,
            self.window_id,
            self.client_rectangle,
            "final",
        )
    }

    /// Both buffers at once: `(image, final)`
    pub fn buffers(&mut self) -> Result<(&mut Canvas, &mut Canvas)> {
        self.check_alive()?;
        let image = Self::ensure(
            &mut self.image_buffer,
            self.window_id,
            self.client_rectangle,
            "image",
        )?;
        let fin = Self::ensure(
            &mut self.final_buffer,
            self.window_id,
            self.client_rectangle,
            "final",
        )?;
        Ok((image, fin))
    }

    /// Check whether the final buffer currently exists
    pub fn has_final_buffer(&self) -> bool {
        self.final_buffer.is_some()
    }

    /// The last presented frame
    pub fn screen(&self) -> Option<&PixelBuffer> {
        self.screen.as_ref()
    }

    /// Composite the image buffer onto the final buffer at the origin
    pub fn render_image(&mut self) -> Result<()> {
        let (image, fin) = self.buffers()?;
        fin.draw_image(image.pixels());
        Ok(())
    }

    /// Copy the final buffer to the screen
    ///
    /// Only the clip rectangle is copied when it is non-empty. Nothing
    /// happens for an empty client area or before anything was rendered.
    pub fn render_to_screen(&mut self) -> Result<()> {
        self.check_alive()?;
        let client = self.client_rectangle;
        if client.is_empty() {
            return Ok(());
        }
        let Some(fin) = self.final_buffer.as_ref() else {
            return Ok(());
        };

        let region = if self.clip_rectangle.is_empty() {
            client
        } else {
            match self.clip_rectangle.intersect(&client) {
                Some(r) => r,
                None => return Ok(()),
            }
        };

        let stale = self
            .screen
            .as_ref()
            .is_none_or(|s| s.width() != client.w || s.height() != client.h);
        if stale {
            self.screen = Some(PixelBuffer::new(client.w, client.h)?);
        }
        if let Some(screen) = self.screen.as_mut() {
            screen.copy_region(fin.pixels(), &region);
        }
        Ok(())
    }

    /// Release both buffers and the screen; safe to call repeatedly
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        log::debug!("window {}: disposing rendering surface", self.window_id);
        self.image_buffer = None;
        self.final_buffer = None;
        self.screen = None;
        self.disposed = true;
    }
}

impl Drop for RenderingSurface {
    fn drop(&mut self) {
        self.dispose();
    }
}
