//! Display-server side of presentation.
//!
//! The presentation queue only needs three things from a display connection: a shared image it
//! can write pixels into, a way to blit that image onto a drawable, and teardown. Dropping a
//! [`SharedImage`] detaches and frees it.

use crate::foundation::core::Drawable;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A 32-bit-per-pixel image shared with the display server.
pub trait SharedImage: Send {
    /// Width in pixels.
    fn width(&self) -> u32;
    /// Height in pixels.
    fn height(&self) -> u32;
    /// Row pitch in bytes.
    fn bytes_per_line(&self) -> usize;
    /// Image bytes, `bytes_per_line * height` long.
    fn data(&self) -> &[u8];
    /// Mutable image bytes.
    fn data_mut(&mut self) -> &mut [u8];
}

/// Display connection used by devices and presentation queues.
pub trait DisplayTransport: Send + Sync {
    /// Allocate and attach a shared image of `width x height` on `screen`.
    fn create_shared_image(
        &self,
        screen: i32,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Box<dyn SharedImage>>;

    /// Blit the top-left `width x height` of `image` to `drawable` and synchronize.
    fn put_image(
        &self,
        drawable: Drawable,
        screen: i32,
        image: &dyn SharedImage,
        width: u32,
        height: u32,
    ) -> anyhow::Result<()>;
}

/// One frame pushed through [`MemoryTransport`].
#[derive(Clone, Debug)]
pub struct Blit {
    /// Destination drawable.
    pub drawable: Drawable,
    /// Blitted width.
    pub width: u32,
    /// Blitted height.
    pub height: u32,
    /// Tightly packed BGRA bytes of the blitted region.
    pub pixels: Vec<u8>,
}

#[derive(Default)]
struct MemoryState {
    images_created: u64,
    blit_count: u64,
    last_blit: Option<Blit>,
}

/// Headless transport keeping the most recent blit in memory.
#[derive(Default)]
pub struct MemoryTransport {
    state: Mutex<MemoryState>,
    live: Arc<AtomicUsize>,
}

impl MemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared images allocated so far.
    pub fn images_created(&self) -> u64 {
        self.state.lock().images_created
    }

    /// Shared images currently attached (allocated and not yet dropped).
    pub fn live_images(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Blits issued so far.
    pub fn blit_count(&self) -> u64 {
        self.state.lock().blit_count
    }

    /// The most recent blit, if any. Earlier frames are not retained.
    pub fn last_blit(&self) -> Option<Blit> {
        self.state.lock().last_blit.clone()
    }
}

struct MemoryImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
    live: Arc<AtomicUsize>,
}

impl SharedImage for MemoryImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn bytes_per_line(&self) -> usize {
        self.width as usize * 4
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Drop for MemoryImage {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

impl DisplayTransport for MemoryTransport {
    fn create_shared_image(
        &self,
        _screen: i32,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Box<dyn SharedImage>> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| anyhow::anyhow!("shared image {width}x{height} overflows"))?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|e| anyhow::anyhow!("shared image {width}x{height}: {e}"))?;
        data.resize(len, 0);
        self.state.lock().images_created += 1;
        self.live.fetch_add(1, Ordering::AcqRel);
        Ok(Box::new(MemoryImage {
            width,
            height,
            data,
            live: Arc::clone(&self.live),
        }))
    }

    fn put_image(
        &self,
        drawable: Drawable,
        _screen: i32,
        image: &dyn SharedImage,
        width: u32,
        height: u32,
    ) -> anyhow::Result<()> {
        let width = width.min(image.width());
        let height = height.min(image.height());
        let row = width as usize * 4;
        let pitch = image.bytes_per_line();
        let mut pixels = Vec::with_capacity(row * height as usize);
        for y in 0..height as usize {
            let start = y * pitch;
            pixels.extend_from_slice(&image.data()[start..start + row]);
        }
        let mut state = self.state.lock();
        state.blit_count += 1;
        state.last_blit = Some(Blit {
            drawable,
            width,
            height,
            pixels,
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/present/transport.rs"]
mod tests;
