//! X11 display transport over the core protocol.

use crate::foundation::core::Drawable;
use crate::present::transport::{DisplayTransport, SharedImage};
use anyhow::Context;
use parking_lot::Mutex;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt, CreateGCAux, ImageFormat};
use x11rb::rust_connection::RustConnection;

/// Presents frames to X11 drawables with `PutImage`.
///
/// Images live client-side and are copied to the server on every blit, split into row bands
/// that fit the server's maximum request size.
pub struct X11Transport {
    conn: Mutex<RustConnection>,
    default_screen: usize,
}

impl X11Transport {
    /// Connect to `display_name`, or to `$DISPLAY` when `None`.
    pub fn connect(display_name: Option<&str>) -> anyhow::Result<Self> {
        let (conn, default_screen) =
            RustConnection::connect(display_name).context("connect to X11 display")?;
        let roots = conn.setup().roots.len();
        tracing::info!(default_screen, roots, "X11 connected");
        Ok(Self {
            conn: Mutex::new(conn),
            default_screen,
        })
    }

    /// Screen index the display name selected.
    pub fn default_screen(&self) -> usize {
        self.default_screen
    }
}

fn root_depth(conn: &RustConnection, screen: i32) -> anyhow::Result<u8> {
    let index = usize::try_from(screen).with_context(|| format!("negative screen {screen}"))?;
    let root = conn
        .setup()
        .roots
        .get(index)
        .with_context(|| format!("screen {screen} does not exist"))?;
    Ok(root.root_depth)
}

struct X11Image {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl SharedImage for X11Image {
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

impl DisplayTransport for X11Transport {
    fn create_shared_image(
        &self,
        screen: i32,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Box<dyn SharedImage>> {
        root_depth(&self.conn.lock(), screen)?;
        u16::try_from(width).with_context(|| format!("image width {width}"))?;
        u16::try_from(height).with_context(|| format!("image height {height}"))?;

        let len = width as usize * height as usize * 4;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .with_context(|| format!("allocate {width}x{height} image"))?;
        data.resize(len, 0);
        Ok(Box::new(X11Image {
            width,
            height,
            data,
        }))
    }

    fn put_image(
        &self,
        drawable: Drawable,
        screen: i32,
        image: &dyn SharedImage,
        width: u32,
        height: u32,
    ) -> anyhow::Result<()> {
        let conn = self.conn.lock();
        let depth = root_depth(&conn, screen)?;
        let width = width.min(image.width());
        let height = height.min(image.height());
        if width == 0 || height == 0 {
            return Ok(());
        }
        let w = u16::try_from(width).context("blit width")?;

        let gc = conn.generate_id().context("allocate graphics context id")?;
        conn.create_gc(gc, drawable, &CreateGCAux::new())
            .context("create graphics context")?;

        let row = width as usize * 4;
        let pitch = image.bytes_per_line();
        // 24 bytes of PutImage header precede the pixel payload.
        let band_rows = (conn.maximum_request_bytes().saturating_sub(24) / row).max(1);
        let mut band = Vec::with_capacity(band_rows.min(height as usize) * row);
        for start in (0..height as usize).step_by(band_rows) {
            let rows = band_rows.min(height as usize - start);
            band.clear();
            for y in start..start + rows {
                band.extend_from_slice(&image.data()[y * pitch..y * pitch + row]);
            }
            conn.put_image(
                ImageFormat::Z_PIXMAP,
                drawable,
                gc,
                w,
                u16::try_from(rows).context("band height")?,
                0,
                i16::try_from(start).context("band origin")?,
                0,
                depth,
                &band,
            )
            .context("put image")?;
        }

        conn.free_gc(gc).context("free graphics context")?;
        conn.get_input_focus()
            .context("sync request")?
            .reply()
            .context("sync reply")?;
        Ok(())
    }
}
