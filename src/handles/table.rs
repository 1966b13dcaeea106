use crate::driver::Device;
use crate::foundation::core::Handle;
use crate::foundation::error::{VdpError, VdpResult};
use crate::present::queue::{PresentationQueue, PresentationQueueTarget};
use crate::render::mixer::VideoMixer;
use crate::surface::bitmap::BitmapSurface;
use crate::surface::output::OutputSurface;
use crate::surface::video::VideoSurface;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Discriminant of every object kind the driver hands out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ObjectKind {
    /// Device.
    Device,
    /// Planar video surface.
    VideoSurface,
    /// Packed bitmap surface.
    BitmapSurface,
    /// Packed output surface.
    OutputSurface,
    /// Video mixer.
    VideoMixer,
    /// Presentation queue target (drawable binding).
    PresentationQueueTarget,
    /// Presentation queue.
    PresentationQueue,
}

/// Closed set of objects stored in the [`HandleTable`].
#[derive(Clone)]
pub(crate) enum Object {
    Device(Arc<Device>),
    VideoSurface(Arc<VideoSurface>),
    BitmapSurface(Arc<BitmapSurface>),
    OutputSurface(Arc<OutputSurface>),
    VideoMixer(Arc<VideoMixer>),
    PresentationQueueTarget(Arc<PresentationQueueTarget>),
    PresentationQueue(Arc<PresentationQueue>),
}

impl Object {
    pub(crate) fn kind(&self) -> ObjectKind {
        match self {
            Object::Device(_) => ObjectKind::Device,
            Object::VideoSurface(_) => ObjectKind::VideoSurface,
            Object::BitmapSurface(_) => ObjectKind::BitmapSurface,
            Object::OutputSurface(_) => ObjectKind::OutputSurface,
            Object::VideoMixer(_) => ObjectKind::VideoMixer,
            Object::PresentationQueueTarget(_) => ObjectKind::PresentationQueueTarget,
            Object::PresentationQueue(_) => ObjectKind::PresentationQueue,
        }
    }
}

struct TableInner {
    next: u32,
    objects: HashMap<Handle, Object>,
}

/// Handle-indexed object store.
///
/// One mutex guards the map; it is held only for the insert/lookup/erase itself, never while
/// pixels are touched. Lookups hand out `Arc` clones so callers work on objects unlocked.
pub struct HandleTable {
    inner: Mutex<TableInner>,
}

impl Default for HandleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HandleTable {
    /// Create an empty table. Handles start at 1, are never 0 and are not reissued while live.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TableInner {
                next: 1,
                objects: HashMap::new(),
            }),
        }
    }

    pub(crate) fn add(&self, object: Object) -> Handle {
        let mut inner = self.inner.lock();
        // After the counter wraps, skip ids that are still in use.
        let mut id = inner.next;
        while inner.objects.contains_key(&Handle(id)) {
            id = id.wrapping_add(1).max(1);
        }
        let handle = Handle(id);
        inner.next = id.wrapping_add(1).max(1);
        let kind = object.kind();
        inner.objects.insert(handle, object);
        tracing::debug!(%handle, ?kind, "handle added");
        handle
    }

    /// Look up `handle`, treating a kind mismatch exactly like a missing handle.
    pub(crate) fn get(&self, handle: Handle, expected: ObjectKind) -> VdpResult<Object> {
        let inner = self.inner.lock();
        match inner.objects.get(&handle) {
            Some(object) if object.kind() == expected => Ok(object.clone()),
            _ => Err(VdpError::invalid_handle(format!(
                "{handle} is not a live {expected:?}"
            ))),
        }
    }

    /// Return `true` when `handle` is live and of kind `expected`.
    pub fn valid(&self, handle: Handle, expected: ObjectKind) -> bool {
        self.inner
            .lock()
            .objects
            .get(&handle)
            .is_some_and(|o| o.kind() == expected)
    }

    /// Look up `handle` as `expected` and erase it in one critical section.
    pub(crate) fn take(&self, handle: Handle, expected: ObjectKind) -> VdpResult<Object> {
        let mut inner = self.inner.lock();
        match inner.objects.get(&handle) {
            Some(object) if object.kind() == expected => {}
            _ => {
                return Err(VdpError::invalid_handle(format!(
                    "{handle} is not a live {expected:?}"
                )));
            }
        }
        let object = inner
            .objects
            .remove(&handle)
            .ok_or_else(|| VdpError::invalid_handle(format!("{handle} vanished")))?;
        tracing::debug!(%handle, ?expected, "handle removed");
        Ok(object)
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.inner.lock().objects.len()
    }

    /// Return `true` when no handle is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn device(&self, handle: Handle) -> VdpResult<Arc<Device>> {
        match self.get(handle, ObjectKind::Device)? {
            Object::Device(d) => Ok(d),
            _ => Err(kind_mismatch(handle)),
        }
    }

    pub(crate) fn video_surface(&self, handle: Handle) -> VdpResult<Arc<VideoSurface>> {
        match self.get(handle, ObjectKind::VideoSurface)? {
            Object::VideoSurface(s) => Ok(s),
            _ => Err(kind_mismatch(handle)),
        }
    }

    pub(crate) fn bitmap_surface(&self, handle: Handle) -> VdpResult<Arc<BitmapSurface>> {
        match self.get(handle, ObjectKind::BitmapSurface)? {
            Object::BitmapSurface(s) => Ok(s),
            _ => Err(kind_mismatch(handle)),
        }
    }

    pub(crate) fn output_surface(&self, handle: Handle) -> VdpResult<Arc<OutputSurface>> {
        match self.get(handle, ObjectKind::OutputSurface)? {
            Object::OutputSurface(s) => Ok(s),
            _ => Err(kind_mismatch(handle)),
        }
    }

    pub(crate) fn video_mixer(&self, handle: Handle) -> VdpResult<Arc<VideoMixer>> {
        match self.get(handle, ObjectKind::VideoMixer)? {
            Object::VideoMixer(m) => Ok(m),
            _ => Err(kind_mismatch(handle)),
        }
    }

    pub(crate) fn presentation_queue_target(
        &self,
        handle: Handle,
    ) -> VdpResult<Arc<PresentationQueueTarget>> {
        match self.get(handle, ObjectKind::PresentationQueueTarget)? {
            Object::PresentationQueueTarget(t) => Ok(t),
            _ => Err(kind_mismatch(handle)),
        }
    }

    pub(crate) fn presentation_queue(&self, handle: Handle) -> VdpResult<Arc<PresentationQueue>> {
        match self.get(handle, ObjectKind::PresentationQueue)? {
            Object::PresentationQueue(q) => Ok(q),
            _ => Err(kind_mismatch(handle)),
        }
    }
}

fn kind_mismatch(handle: Handle) -> VdpError {
    VdpError::invalid_handle(format!("{handle} changed kind during lookup"))
}

#[cfg(test)]
#[path = "../../tests/unit/handles/table.rs"]
mod tests;
