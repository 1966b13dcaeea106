use super::*;
use crate::foundation::core::RgbaFormat;
use crate::foundation::error::Status;
use crate::present::transport::MemoryTransport;

struct Fixture {
    driver: Driver,
    transport: Arc<MemoryTransport>,
    device: Handle,
    queue: Handle,
}

fn fixture() -> Fixture {
    let driver = Driver::default();
    let transport = Arc::new(MemoryTransport::new());
    let (device, _) = driver.device_create_x11(transport.clone(), 0).unwrap();
    let target = driver
        .presentation_queue_target_create_x11(device, 0x42)
        .unwrap();
    let queue = driver.presentation_queue_create(device, target).unwrap();
    Fixture {
        driver,
        transport,
        device,
        queue,
    }
}

fn output(f: &Fixture, w: u32, h: u32) -> Handle {
    f.driver
        .output_surface_create(f.device, RgbaFormat::B8G8R8A8, w, h)
        .unwrap()
}

#[test]
fn first_display_allocates_and_blits() {
    let f = fixture();
    let s = output(&f, 4, 2);
    {
        let surface = f.driver.handles.output_surface(s).unwrap();
        surface.pixels.lock().data_mut().fill(0xAB);
    }
    assert_eq!(f.driver.presentation_queue_stats(f.queue).unwrap().allocations, 0);

    f.driver.presentation_queue_display(f.queue, s, 0, 0, 0).unwrap();
    let stats = f.driver.presentation_queue_stats(f.queue).unwrap();
    assert_eq!(stats.allocations, 1);
    assert_eq!(stats.buffer_size, Some((4, 2)));
    assert_eq!(stats.frames_displayed, 1);

    let blit = f.transport.last_blit().unwrap();
    assert_eq!(blit.drawable, 0x42);
    assert_eq!((blit.width, blit.height), (4, 2));
    assert!(blit.pixels.iter().all(|&b| b == 0xAB));
}

#[test]
fn same_size_reuses_image_and_new_size_replaces_it() {
    let f = fixture();
    let a = output(&f, 8, 8);
    let b = output(&f, 8, 8);
    let c = output(&f, 16, 4);

    f.driver.presentation_queue_display(f.queue, a, 0, 0, 0).unwrap();
    f.driver.presentation_queue_display(f.queue, b, 0, 0, 0).unwrap();
    assert_eq!(f.transport.images_created(), 1);

    f.driver.presentation_queue_display(f.queue, c, 0, 0, 0).unwrap();
    assert_eq!(f.transport.images_created(), 2);
    assert_eq!(f.transport.live_images(), 1);
    let stats = f.driver.presentation_queue_stats(f.queue).unwrap();
    assert_eq!(stats.buffer_size, Some((16, 4)));
    assert_eq!(stats.frames_displayed, 3);
}

#[test]
fn display_validates_handles() {
    let f = fixture();
    let s = output(&f, 2, 2);
    let err = f
        .driver
        .presentation_queue_display(Handle(999), s, 0, 0, 0)
        .unwrap_err();
    assert_eq!(err.status(), Status::InvalidHandle);
    let err = f
        .driver
        .presentation_queue_display(f.queue, f.device, 0, 0, 0)
        .unwrap_err();
    assert_eq!(err.status(), Status::InvalidHandle);
    assert_eq!(f.transport.images_created(), 0);
}

#[test]
fn destroy_releases_the_shared_image() {
    let f = fixture();
    let s = output(&f, 2, 2);
    f.driver.presentation_queue_display(f.queue, s, 0, 0, 0).unwrap();
    assert_eq!(f.transport.live_images(), 1);
    f.driver.presentation_queue_destroy(f.queue).unwrap();
    assert_eq!(f.transport.live_images(), 0);
    assert!(f.driver.presentation_queue_stats(f.queue).is_err());
}

#[test]
fn status_and_time_queries() {
    let f = fixture();
    let s = output(&f, 1, 1);
    let t0 = f.driver.presentation_queue_get_time(f.queue).unwrap();
    let (status, t1) = f
        .driver
        .presentation_queue_query_surface_status(f.queue, s)
        .unwrap();
    assert_eq!(status, PresentationQueueStatus::Visible);
    assert!(t1 >= t0);
    let t2 = f
        .driver
        .presentation_queue_block_until_surface_idle(f.queue, s)
        .unwrap();
    assert!(t2 >= t1);
    assert!(
        f.driver
            .presentation_queue_block_until_surface_idle(f.queue, Handle(321))
            .is_err()
    );
}

#[test]
fn background_color_is_not_implemented() {
    let f = fixture();
    let err = f
        .driver
        .presentation_queue_set_background_color(f.queue, &Color::default())
        .unwrap_err();
    assert_eq!(err.status(), Status::NoImplementation);
    assert_eq!(
        f.driver
            .presentation_queue_get_background_color(f.queue)
            .unwrap_err()
            .status(),
        Status::NoImplementation
    );
}

/// Memory transport whose allocations can be switched off.
#[derive(Default)]
struct FailingTransport {
    inner: MemoryTransport,
    refuse: std::sync::atomic::AtomicBool,
}

impl crate::present::transport::DisplayTransport for FailingTransport {
    fn create_shared_image(
        &self,
        screen: i32,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Box<dyn SharedImage>> {
        if self.refuse.load(std::sync::atomic::Ordering::Acquire) {
            anyhow::bail!("display server refused a {width}x{height} image");
        }
        self.inner.create_shared_image(screen, width, height)
    }

    fn put_image(
        &self,
        drawable: Drawable,
        screen: i32,
        image: &dyn SharedImage,
        width: u32,
        height: u32,
    ) -> anyhow::Result<()> {
        self.inner.put_image(drawable, screen, image, width, height)
    }
}

#[test]
fn failed_reallocation_reports_no_buffer() {
    let driver = Driver::default();
    let transport = Arc::new(FailingTransport::default());
    let (device, _) = driver.device_create_x11(transport.clone(), 0).unwrap();
    let target = driver
        .presentation_queue_target_create_x11(device, 3)
        .unwrap();
    let queue = driver.presentation_queue_create(device, target).unwrap();
    let small = driver
        .output_surface_create(device, RgbaFormat::B8G8R8A8, 8, 8)
        .unwrap();
    let large = driver
        .output_surface_create(device, RgbaFormat::B8G8R8A8, 16, 16)
        .unwrap();

    driver.presentation_queue_display(queue, small, 0, 0, 0).unwrap();
    transport
        .refuse
        .store(true, std::sync::atomic::Ordering::Release);
    let err = driver
        .presentation_queue_display(queue, large, 0, 0, 0)
        .unwrap_err();
    assert_eq!(err.status(), Status::Resources);

    let stats = driver.presentation_queue_stats(queue).unwrap();
    assert_eq!(transport.inner.live_images(), 0);
    assert_eq!(stats.buffer_size, None);
    assert_eq!(stats.allocations, 1);
    assert_eq!(stats.frames_displayed, 1);

    transport
        .refuse
        .store(false, std::sync::atomic::Ordering::Release);
    driver.presentation_queue_display(queue, large, 0, 0, 0).unwrap();
    let stats = driver.presentation_queue_stats(queue).unwrap();
    assert_eq!(stats.buffer_size, Some((16, 16)));
    assert_eq!(stats.allocations, 2);
}
