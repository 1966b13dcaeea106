use crate::driver::{Device, Driver};
use crate::foundation::core::{Color, Drawable, Handle, PresentationQueueStatus, Time};
use crate::foundation::error::{VdpError, VdpResult};
use crate::handles::table::{Object, ObjectKind};
use crate::present::transport::SharedImage;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Binding of a device to a display drawable.
pub struct PresentationQueueTarget {
    pub(crate) device: Arc<Device>,
    pub(crate) drawable: Drawable,
}

/// Counters describing a queue's shared-image usage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PresentationStats {
    /// Shared images allocated over the queue's lifetime.
    pub allocations: u64,
    /// Size of the currently held image, if any.
    pub buffer_size: Option<(u32, u32)>,
    /// Successful `display` calls.
    pub frames_displayed: u64,
}

struct QueueState {
    image: Option<Box<dyn SharedImage>>,
    stats: PresentationStats,
}

/// Presentation queue pushing output surfaces to its target.
pub struct PresentationQueue {
    pub(crate) device: Arc<Device>,
    pub(crate) target: Arc<PresentationQueueTarget>,
    state: Mutex<QueueState>,
}

fn now() -> VdpResult<Time> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| VdpError::error(format!("clock before unix epoch: {e}")))?;
    u64::try_from(elapsed.as_nanos()).map_err(|e| VdpError::error(format!("clock overflow: {e}")))
}

impl Driver {
    /// Bind `drawable` as a presentation target of `device`.
    #[tracing::instrument(skip(self))]
    pub fn presentation_queue_target_create_x11(
        &self,
        device: Handle,
        drawable: Drawable,
    ) -> VdpResult<Handle> {
        let device = self.handles.device(device)?;
        let target = PresentationQueueTarget { device, drawable };
        let handle = self
            .handles
            .add(Object::PresentationQueueTarget(Arc::new(target)));
        Ok(handle)
    }

    /// Destroy a presentation target.
    #[tracing::instrument(skip(self))]
    pub fn presentation_queue_target_destroy(&self, target: Handle) -> VdpResult<()> {
        self.handles.take(target, ObjectKind::PresentationQueueTarget)?;
        Ok(())
    }

    /// Create a queue presenting to `target`. No shared image is allocated until the first display.
    #[tracing::instrument(skip(self))]
    pub fn presentation_queue_create(&self, device: Handle, target: Handle) -> VdpResult<Handle> {
        let device = self.handles.device(device)?;
        let target = self.handles.presentation_queue_target(target)?;
        if !Arc::ptr_eq(&device, &target.device) {
            tracing::debug!("queue device differs from the target's device");
        }
        let queue = PresentationQueue {
            device,
            target,
            state: Mutex::new(QueueState {
                image: None,
                stats: PresentationStats::default(),
            }),
        };
        Ok(self.handles.add(Object::PresentationQueue(Arc::new(queue))))
    }

    /// Destroy a queue, releasing its shared image.
    #[tracing::instrument(skip(self))]
    pub fn presentation_queue_destroy(&self, queue: Handle) -> VdpResult<()> {
        if let Object::PresentationQueue(queue) =
            self.handles.take(queue, ObjectKind::PresentationQueue)?
        {
            queue.state.lock().image = None;
        }
        Ok(())
    }

    /// Not implemented.
    pub fn presentation_queue_set_background_color(
        &self,
        _queue: Handle,
        _color: &Color,
    ) -> VdpResult<()> {
        Err(VdpError::no_implementation(
            "presentation_queue_set_background_color",
        ))
    }

    /// Not implemented.
    pub fn presentation_queue_get_background_color(&self, _queue: Handle) -> VdpResult<Color> {
        Err(VdpError::no_implementation(
            "presentation_queue_get_background_color",
        ))
    }

    /// Wall-clock time in nanoseconds since the Unix epoch.
    pub fn presentation_queue_get_time(&self, queue: Handle) -> VdpResult<Time> {
        self.handles.presentation_queue(queue)?;
        now()
    }

    /// Show `surface` on the queue's drawable immediately.
    ///
    /// The queue keeps one shared image sized like the last displayed surface; it is replaced
    /// only when the surface size changes. `clip_width`, `clip_height` and
    /// `earliest_presentation_time` are accepted and ignored.
    #[tracing::instrument(skip(self))]
    pub fn presentation_queue_display(
        &self,
        queue: Handle,
        surface: Handle,
        clip_width: u32,
        clip_height: u32,
        earliest_presentation_time: Time,
    ) -> VdpResult<()> {
        let queue = self.handles.presentation_queue(queue)?;
        let surface = self.handles.output_surface(surface)?;
        let transport = &queue.device.transport;
        let screen = queue.device.screen;

        let pixels = surface.pixels.lock();
        let (width, height) = (pixels.width(), pixels.height());
        let mut state = queue.state.lock();
        if state
            .image
            .as_ref()
            .is_some_and(|img| (img.width(), img.height()) != (width, height))
        {
            tracing::debug!(width, height, "surface size changed, dropping shared image");
            state.image = None;
            state.stats.buffer_size = None;
        }
        let QueueState { image, stats } = &mut *state;
        let image = match image {
            Some(image) => image,
            None => {
                let fresh = transport
                    .create_shared_image(screen, width, height)
                    .map_err(|e| VdpError::resources(format!("shared image: {e:#}")))?;
                stats.allocations += 1;
                stats.buffer_size = Some((width, height));
                image.insert(fresh)
            }
        };

        let row = width as usize * 4;
        let src_stride = pixels.stride();
        let dst_stride = image.bytes_per_line();
        let dst = image.data_mut();
        for y in 0..height as usize {
            dst[y * dst_stride..y * dst_stride + row]
                .copy_from_slice(&pixels.data()[y * src_stride..y * src_stride + row]);
        }
        let generation = pixels.generation();
        drop(pixels);

        transport
            .put_image(queue.target.drawable, screen, &**image, width, height)
            .map_err(|e| VdpError::error(format!("put image: {e:#}")))?;
        stats.frames_displayed += 1;
        tracing::trace!(generation, drawable = queue.target.drawable, "frame displayed");
        Ok(())
    }

    /// Presentation is synchronous, so every surface is already idle.
    #[tracing::instrument(skip(self))]
    pub fn presentation_queue_block_until_surface_idle(
        &self,
        queue: Handle,
        surface: Handle,
    ) -> VdpResult<Time> {
        self.handles.presentation_queue(queue)?;
        self.handles.output_surface(surface)?;
        now()
    }

    /// Every displayed surface reports visible as of now.
    #[tracing::instrument(skip(self))]
    pub fn presentation_queue_query_surface_status(
        &self,
        queue: Handle,
        surface: Handle,
    ) -> VdpResult<(PresentationQueueStatus, Time)> {
        self.handles.presentation_queue(queue)?;
        self.handles.output_surface(surface)?;
        Ok((PresentationQueueStatus::Visible, now()?))
    }

    /// Shared-image counters of `queue`.
    pub fn presentation_queue_stats(&self, queue: Handle) -> VdpResult<PresentationStats> {
        let queue = self.handles.presentation_queue(queue)?;
        let stats = queue.state.lock().stats;
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/present/queue.rs"]
mod tests;
