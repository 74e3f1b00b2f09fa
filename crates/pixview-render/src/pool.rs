//! Renderer pool
//!
//! Renderers hold caches that are worth keeping between draws but must
//! not be shared while drawing. A [`RendererPool`] hands out renderers
//! through [`RendererLease`] guards; a lease puts its renderer back in
//! the pool when dropped.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::walker::Renderer;

/// A set of reusable renderers built on demand
pub struct RendererPool<R: Renderer> {
    idle: RefCell<Vec<R>>,
    factory: Box<dyn Fn() -> R>,
    leased: Cell<usize>,
}

impl<R: Renderer> fmt::Debug for RendererPool<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererPool")
            .field("idle", &self.idle.borrow().len())
            .field("leased", &self.leased.get())
            .finish()
    }
}

impl<R: Renderer + Default + 'static> Default for RendererPool<R> {
    fn default() -> Self {
        Self::new(R::default)
    }
}

impl<R: Renderer> RendererPool<R> {
    /// Create an empty pool that builds renderers with `factory`
    pub fn new(factory: impl Fn() -> R + 'static) -> Self {
        Self {
            idle: RefCell::new(Vec::new()),
            factory: Box::new(factory),
            leased: Cell::new(0),
        }
    }

    /// Take an idle renderer, or build one
    pub fn lease(&self) -> RendererLease<'_, R> {
        let pooled = self.idle.borrow_mut().pop();
        let renderer = pooled.unwrap_or_else(|| {
            log::debug!("renderer pool: building a renderer");
            (self.factory)()
        });
        self.leased.set(self.leased.get() + 1);
        RendererLease {
            pool: self,
            renderer: Some(renderer),
        }
    }

    /// Number of renderers waiting in the pool
    pub fn idle_count(&self) -> usize {
        self.idle.borrow().len()
    }

    /// Number of renderers currently leased
    pub fn leased_count(&self) -> usize {
        self.leased.get()
    }

    /// Dispose and drop every idle renderer
    ///
    /// Leased renderers are not touched; they return to the pool as usual.
    pub fn dispose_all(&self) {
        let idle = std::mem::take(&mut *self.idle.borrow_mut());
        log::debug!("renderer pool: disposing {} idle renderers", idle.len());
        for mut renderer in idle {
            renderer.dispose();
        }
    }

    fn give_back(&self, renderer: R) {
        self.leased.set(self.leased.get().saturating_sub(1));
        self.idle.borrow_mut().push(renderer);
    }
}

/// A renderer on loan from a [`RendererPool`]
pub struct RendererLease<'a, R: Renderer> {
    pool: &'a RendererPool<R>,
    renderer: Option<R>,
}

impl<R: Renderer> RendererLease<'_, R> {
    /// Return the renderer to the pool now
    pub fn release(self) {}
}

impl<R: Renderer> Deref for RendererLease<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        match &self.renderer {
            Some(renderer) => renderer,
            None => unreachable!("lease used after release"),
        }
    }
}

impl<R: Renderer> DerefMut for RendererLease<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        match &mut self.renderer {
            Some(renderer) => renderer,
            None => unreachable!("lease used after release"),
        }
    }
}

impl<R: Renderer> Drop for RendererLease<'_, R> {
    fn drop(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            self.pool.give_back(renderer);
        }
    }
}
