//! Low-level FFI bindings for the Measurement Computing Universal Library.
//!
//! Only the temperature-input subset of the library is bound:
//!
//! - `cbDeclareRevision` - declare the header revision the caller was built against
//! - `cbErrHandling` - select how the library reports and reacts to errors
//! - `cbTIn` - read one temperature sample from a thermocouple channel
//! - `cbGetErrMsg` - translate an error code into message text
//!
//! # Safety
//!
//! All functions in this crate are `unsafe` as they are direct FFI bindings.
//! For a safe wrapper, use the `daq-thermocouple` crate instead.
//!
//! # Features
//!
//! - `ul-sdk`: Generate bindings from the installed `cbw.h` header and link
//!   the vendor import library. Without this feature, pre-defined bindings
//!   are used so the workspace builds without the SDK. Their functions fail
//!   with `LIBRARY_NOT_AVAILABLE`, which `cbGetErrMsg` also explains.
//!
//! # Example (unsafe)
//!
//! ```no_run
//! use mcc_ul_sys::*;
//!
//! unsafe {
//!     let mut revision = CURRENTREVNUM as f32;
//!     cbDeclareRevision(&mut revision);
//!     cbErrHandling(DONTPRINT as i32, DONTSTOP as i32);
//!
//!     let mut temperature = 0.0f32;
//!     let code = cbTIn(0, 0, CELSIUS as i32, &mut temperature, 0);
//!     if code == NOERRORS as i32 {
//!         println!("Channel 0: {:.2} C", temperature);
//!     }
//! }
//! ```

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(dead_code)]
#![allow(clippy::all)]

// Include the generated bindings
include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
