use crate::foundation::core::{ColorStandard, CscMatrix, Handle, PROCAMP_VERSION, Procamp};
use crate::foundation::error::{Status, VdpError, VdpResult};
use crate::foundation::opts::DriverOpts;
use crate::handles::table::{HandleTable, Object, ObjectKind};
use crate::present::transport::DisplayTransport;
use crate::procs::{FuncId, get_proc_address};
use std::sync::Arc;

/// Version of the emulated API.
pub const API_VERSION: u32 = 1;

/// Function-resolution entry returned by device creation.
pub type GetProcAddress = fn(&Driver, Handle, u32) -> VdpResult<FuncId>;

/// Callback fired when the display is preempted.
pub type PreemptionCallback = Box<dyn Fn(Handle) + Send + Sync>;

/// A display connection plus screen index; every other object belongs to one device.
pub struct Device {
    pub(crate) transport: Arc<dyn DisplayTransport>,
    pub(crate) screen: i32,
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("screen", &self.screen)
            .finish_non_exhaustive()
    }
}

/// The emulated device driver.
///
/// Owns the handle table; every operation of the emulated API is a method on this type. Calls
/// are synchronous and complete all their work, presentation included, before returning.
pub struct Driver {
    pub(crate) handles: HandleTable,
    pub(crate) opts: DriverOpts,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new(DriverOpts::default())
    }
}

impl Driver {
    /// Create a driver with explicit options.
    pub fn new(opts: DriverOpts) -> Self {
        Self {
            handles: HandleTable::new(),
            opts,
        }
    }

    /// Create a driver configured from the environment (see [`DriverOpts::from_env`]).
    pub fn from_env() -> VdpResult<Self> {
        Ok(Self::new(DriverOpts::from_env()?))
    }

    /// Options this driver answers capability queries with.
    pub fn opts(&self) -> &DriverOpts {
        &self.opts
    }

    /// The handle table backing this driver.
    pub fn handles(&self) -> &HandleTable {
        &self.handles
    }

    /// Entry point: create a device on `screen` of the given display connection.
    #[tracing::instrument(skip(self, transport))]
    pub fn device_create_x11(
        &self,
        transport: Arc<dyn DisplayTransport>,
        screen: i32,
    ) -> VdpResult<(Handle, GetProcAddress)> {
        let device = Device { transport, screen };
        let handle = self.handles.add(Object::Device(Arc::new(device)));
        Ok((handle, get_proc_address))
    }

    /// Destroy a device. Child objects are not destroyed with it.
    #[tracing::instrument(skip(self))]
    pub fn device_destroy(&self, device: Handle) -> VdpResult<()> {
        self.handles.take(device, ObjectKind::Device)?;
        Ok(())
    }

    /// Version of the emulated API.
    pub fn get_api_version(&self) -> u32 {
        API_VERSION
    }

    /// Implementation description string.
    pub fn get_information_string(&self) -> &str {
        &self.opts.information_string
    }

    /// Human readable description of `status`.
    pub fn get_error_string(&self, status: Status) -> &'static str {
        status.description()
    }

    /// Build a Y'CbCr to RGB conversion matrix for `standard`.
    ///
    /// The procamp adjustments are validated but not applied; the fixed matrix of the standard is
    /// returned.
    #[tracing::instrument(skip(self))]
    pub fn generate_csc_matrix(
        &self,
        procamp: Option<&Procamp>,
        standard: ColorStandard,
    ) -> VdpResult<CscMatrix> {
        let procamp =
            procamp.ok_or_else(|| VdpError::invalid_pointer("procamp must be provided"))?;
        if procamp.struct_version != PROCAMP_VERSION {
            return Err(VdpError::invalid_value(format!(
                "procamp struct_version {} != {PROCAMP_VERSION}",
                procamp.struct_version
            )));
        }

        Ok(match standard {
            ColorStandard::ItuRBt601 => [
                [1.16438, 0.0, 1.59603, -222.921],
                [1.16438, -0.39176, -0.81297, 135.576],
                [1.16438, 2.01723, 0.0, -276.836],
            ],
            ColorStandard::ItuRBt709 => [
                [1.0, 0.0, 1.402, -179.456],
                [1.0, -0.34414, -0.71414, 135.460],
                [1.0, 1.772, 0.0, -226.816],
            ],
            ColorStandard::Smpte240M => [
                [0.58139, -0.76437, 1.5760, 0.0],
                [0.58140, -0.99101, -0.47663, 0.0],
                [0.58139, 1.0616, 0.0, 0.0],
            ],
        })
    }

    /// Preemption never happens in software; registration is not implemented.
    #[tracing::instrument(skip(self, _callback))]
    pub fn preemption_callback_register(
        &self,
        device: Handle,
        _callback: Option<PreemptionCallback>,
    ) -> VdpResult<()> {
        Err(VdpError::no_implementation("preemption_callback_register"))
    }
}

#[cfg(test)]
#[path = "../tests/unit/driver.rs"]
mod tests;
