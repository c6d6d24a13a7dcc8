//! Universal Library implementation of the driver contract.

use std::ffi::CStr;
use std::os::raw::c_char;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::{ErrorCode, ErrorHandling, ErrorReporting, ThermocoupleDriver};
use crate::thermocouple::{TemperatureScale, ThermocoupleType};

/// Driver backed by the vendor's Universal Library.
///
/// The library keeps global state of its own, so every FFI call is
/// serialized through a single lock.
#[derive(Debug, Default)]
pub struct UniversalLibrary {
    ffi_lock: Mutex<()>,
}

impl UniversalLibrary {
    /// Create a handle to the library. No FFI call is made until first use.
    pub fn new() -> Self {
        info!("Using Universal Library thermocouple driver");
        Self::default()
    }

    fn with_lock<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = self.ffi_lock.lock();
        f()
    }
}

fn check(status: i32) -> Result<(), ErrorCode> {
    if status == mcc_ul_sys::NOERRORS as i32 {
        Ok(())
    } else {
        Err(ErrorCode(status))
    }
}

impl ThermocoupleDriver for UniversalLibrary {
    fn declare_revision(&self, revision: f32) -> Result<f32, ErrorCode> {
        let mut rev = revision;
        // SAFETY: rev is a valid, exclusively borrowed f32 for the call
        let status = self.with_lock(|| unsafe { mcc_ul_sys::cbDeclareRevision(&mut rev) });
        check(status)?;
        Ok(rev)
    }

    fn configure_error_handling(
        &self,
        reporting: ErrorReporting,
        handling: ErrorHandling,
    ) -> Result<(), ErrorCode> {
        // SAFETY: plain integer arguments
        let status = self.with_lock(|| unsafe {
            mcc_ul_sys::cbErrHandling(reporting.code(), handling.code())
        });
        check(status)
    }

    fn read_temperature(
        &self,
        board: i32,
        channel: i32,
        scale: TemperatureScale,
        thermocouple_type: ThermocoupleType,
    ) -> Result<f32, ErrorCode> {
        let mut value: f32 = 0.0;
        // SAFETY: value is a valid, exclusively borrowed f32 for the call
        let status = self.with_lock(|| unsafe {
            mcc_ul_sys::cbTIn(
                board,
                channel,
                scale.code(),
                &mut value,
                thermocouple_type.code(),
            )
        });
        check(status)?;
        debug!(board, channel, value, "cbTIn");
        Ok(value)
    }

    fn error_message(&self, code: ErrorCode) -> String {
        let mut buf = vec![0 as c_char; mcc_ul_sys::ERRSTRLEN as usize + 1];
        // SAFETY: buf holds ERRSTRLEN + 1 bytes, the documented maximum message size
        let status = self.with_lock(|| unsafe { mcc_ul_sys::cbGetErrMsg(code.0, buf.as_mut_ptr()) });
        if check(status).is_err() {
            return format!("Universal Library error {}", code);
        }

        // SAFETY: buf is zero-initialized and one byte longer than any message,
        // so it is always nul-terminated
        let message = unsafe { CStr::from_ptr(buf.as_ptr()) }
            .to_string_lossy()
            .trim()
            .to_string();
        if message.is_empty() {
            format!("Universal Library error {}", code)
        } else {
            message
        }
    }
}
