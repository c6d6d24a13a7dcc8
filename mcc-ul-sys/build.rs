//! Build script for mcc-ul-sys FFI bindings.
//!
//! This script generates Rust FFI bindings from the Universal Library `cbw.h`
//! header using bindgen. It supports two modes:
//!
//! 1. With `ul-sdk` feature: Generates bindings from the installed header and
//!    links the `cbw64` (or `cbw32`) import library
//! 2. Without feature: Uses pre-defined bindings so the workspace builds on
//!    machines without the vendor SDK

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=wrapper.h");
    println!("cargo:rerun-if-env-changed=MCCUL_INCLUDE_DIR");
    println!("cargo:rerun-if-env-changed=MCCUL_LIB_DIR");

    #[cfg(feature = "ul-sdk")]
    generate_bindings();

    #[cfg(not(feature = "ul-sdk"))]
    generate_dummy_bindings();

    #[cfg(feature = "ul-sdk")]
    {
        let lib_name = if env::var("CARGO_CFG_TARGET_POINTER_WIDTH").as_deref() == Ok("32") {
            "cbw32"
        } else {
            "cbw64"
        };

        if let Ok(dir) = env::var("MCCUL_LIB_DIR") {
            println!("cargo:rustc-link-search=native={}", dir);
        } else {
            // Default InstaCal / MCC DAQ install locations
            let lib_paths = [
                r"C:\Program Files (x86)\Measurement Computing\DAQ\C",
                r"C:\Program Files\Measurement Computing\DAQ\C",
            ];

            for path in lib_paths {
                if std::path::Path::new(path)
                    .join(format!("{}.lib", lib_name))
                    .exists()
                {
                    println!("cargo:rustc-link-search=native={}", path);
                    break;
                }
            }
        }

        println!("cargo:rustc-link-lib=dylib={}", lib_name);
    }
}

#[cfg(feature = "ul-sdk")]
fn generate_bindings() {
    let include_dir = env::var("MCCUL_INCLUDE_DIR").unwrap_or_else(|_| {
        for path in [
            r"C:\Program Files (x86)\Measurement Computing\DAQ\C",
            r"C:\Program Files\Measurement Computing\DAQ\C",
            "/usr/local/include",
        ] {
            if std::path::Path::new(path).join("cbw.h").exists() {
                return path.to_string();
            }
        }
        ".".to_string()
    });

    println!("cargo:rerun-if-changed={}/cbw.h", include_dir);

    let bindings = bindgen::Builder::default()
        .header("wrapper.h")
        .clang_arg(format!("-I{}", include_dir))
        // Only the temperature-input subset is bound
        .allowlist_function("cbDeclareRevision")
        .allowlist_function("cbErrHandling")
        .allowlist_function("cbTIn")
        .allowlist_function("cbGetErrMsg")
        // Scale, error-handling and revision constants
        .allowlist_var("CELSIUS|FAHRENHEIT|KELVIN")
        .allowlist_var("NOERRORS|ERRSTRLEN|CURRENTREVNUM")
        .allowlist_var("DONTPRINT|PRINTWARNINGS|PRINTFATAL|PRINTALL")
        .allowlist_var("DONTSTOP|STOPFATAL|STOPALL")
        .derive_debug(true)
        .derive_default(true)
        .generate_comments(true)
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()))
        .generate()
        .expect("Unable to generate Universal Library bindings");

    let out_path = PathBuf::from(env::var("OUT_DIR").unwrap());
    bindings
        .write_to_file(out_path.join("bindings.rs"))
        .expect("Couldn't write bindings!");
}

/// Generate dummy bindings when the SDK is not available.
/// This allows the crate to compile on systems without the Universal Library.
#[cfg(not(feature = "ul-sdk"))]
fn generate_dummy_bindings() {
    let out_path = PathBuf::from(env::var("OUT_DIR").unwrap());
    let dummy = r#"
// Dummy bindings - ul-sdk feature not enabled
//
// These are placeholder constants and functions that allow the crate to
// compile without cbw.h. Enable the `ul-sdk` feature to generate real
// bindings.

use std::os::raw::{c_char, c_int};

// Revision this crate was written against (cbw.h CURRENTREVNUM)
pub const CURRENTREVNUM: f64 = 6.73;

// Error codes
pub const NOERRORS: u32 = 0;
pub const ERRSTRLEN: u32 = 256;

// Temperature scales
pub const CELSIUS: u32 = 0;
pub const FAHRENHEIT: u32 = 1;
pub const KELVIN: u32 = 2;

// Error reporting
pub const DONTPRINT: u32 = 0;
pub const PRINTWARNINGS: u32 = 1;
pub const PRINTFATAL: u32 = 2;
pub const PRINTALL: u32 = 3;

// Error handling
pub const DONTSTOP: u32 = 0;
pub const STOPFATAL: u32 = 1;
pub const STOPALL: u32 = 2;

// Stub implementations - these allow linking to succeed. Every call fails
// with LIBRARY_NOT_AVAILABLE so callers see an ordinary error status.

// Status returned by every stub; not a code the real library uses
pub const LIBRARY_NOT_AVAILABLE: c_int = -1;

const LIBRARY_NOT_AVAILABLE_MSG: &[u8] =
    b"Universal Library not available (built without the ul-sdk feature)";

#[no_mangle]
pub unsafe extern "C" fn cbDeclareRevision(_RevNum: *mut f32) -> c_int {
    LIBRARY_NOT_AVAILABLE
}

#[no_mangle]
pub unsafe extern "C" fn cbErrHandling(_ErrReporting: c_int, _ErrHandling: c_int) -> c_int {
    LIBRARY_NOT_AVAILABLE
}

#[no_mangle]
pub unsafe extern "C" fn cbTIn(
    _BoardNum: c_int,
    _Chan: c_int,
    _Scale: c_int,
    _TempValue: *mut f32,
    _Options: c_int,
) -> c_int {
    LIBRARY_NOT_AVAILABLE
}

/// Writes the stub message for LIBRARY_NOT_AVAILABLE, an empty string otherwise.
///
/// `ErrMsg` must point to at least ERRSTRLEN bytes, as with the real library.
#[no_mangle]
pub unsafe extern "C" fn cbGetErrMsg(ErrCode: c_int, ErrMsg: *mut c_char) -> c_int {
    if ErrMsg.is_null() {
        return LIBRARY_NOT_AVAILABLE;
    }
    let text: &[u8] = if ErrCode == LIBRARY_NOT_AVAILABLE {
        LIBRARY_NOT_AVAILABLE_MSG
    } else {
        b""
    };
    let len = text.len().min(ERRSTRLEN as usize - 1);
    std::ptr::copy_nonoverlapping(text.as_ptr() as *const c_char, ErrMsg, len);
    *ErrMsg.add(len) = 0;
    NOERRORS as c_int
}
"#;

    std::fs::write(out_path.join("bindings.rs"), dummy).expect("Couldn't write dummy bindings!");
}
