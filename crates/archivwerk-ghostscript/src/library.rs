// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Library backend — in-process Ghostscript through the `gsapi_*` C API.
//
// Unsafe code in this module is limited to the FFI calls below. Every call
// passes either the instance pointer obtained from `gsapi_new_instance` (and
// not yet deleted) or pointers into Rust-owned buffers that outlive the call.

use std::ffi::{CStr, CString, c_char, c_int, c_long, c_void};
use std::ptr;

use archivwerk_core::error::{ArchivwerkError, Result};
use tracing::{debug, instrument, warn};

use crate::traits::*;

// ---------------------------------------------------------------------------
// gsapi FFI
// ---------------------------------------------------------------------------

/// Returned by `gsapi_init_with_args` when the run ended through `quit`.
const GS_ERROR_QUIT: c_int = -101;
/// `gsapi_set_arg_encoding` value for UTF-8 arguments.
const GS_ARG_ENCODING_UTF8: c_int = 1;

#[repr(C)]
struct GsapiRevision {
    product: *const c_char,
    copyright: *const c_char,
    revision: c_long,
    revisiondate: c_long,
}

#[cfg_attr(windows, link(name = "gsdll64"))]
#[cfg_attr(not(windows), link(name = "gs"))]
unsafe extern "C" {
    fn gsapi_revision(pr: *mut GsapiRevision, len: c_int) -> c_int;
    fn gsapi_new_instance(pinstance: *mut *mut c_void, caller_handle: *mut c_void) -> c_int;
    fn gsapi_delete_instance(instance: *mut c_void);
    fn gsapi_set_arg_encoding(instance: *mut c_void, encoding: c_int) -> c_int;
    fn gsapi_init_with_args(instance: *mut c_void, argc: c_int, argv: *mut *mut c_char) -> c_int;
    fn gsapi_exit(instance: *mut c_void) -> c_int;
}

fn interpreter_error(code: c_int, call: &str) -> ArchivwerkError {
    ArchivwerkError::Interpreter {
        code,
        message: format!("{call} returned {code}"),
    }
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// Backend bound to the linked Ghostscript shared library.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryBackend;

impl InterpreterBackend for LibraryBackend {
    fn name(&self) -> &str {
        "library"
    }

    fn new_instance(&self) -> Result<Box<dyn Interpreter>> {
        let mut instance: *mut c_void = ptr::null_mut();
        // SAFETY: `instance` is a valid out-pointer; a null caller handle is allowed.
        let code = unsafe { gsapi_new_instance(&mut instance, ptr::null_mut()) };
        if code < 0 || instance.is_null() {
            return Err(interpreter_error(code, "gsapi_new_instance"));
        }

        // SAFETY: `instance` was just created and is still live.
        let code = unsafe { gsapi_set_arg_encoding(instance, GS_ARG_ENCODING_UTF8) };
        if code < 0 {
            // SAFETY: nothing else references the instance yet.
            unsafe { gsapi_delete_instance(instance) };
            return Err(interpreter_error(code, "gsapi_set_arg_encoding"));
        }

        debug!("gsapi instance created");
        Ok(Box::new(LibraryInterpreter {
            instance,
            initialized: false,
        }))
    }

    fn revision(&self) -> Result<Revision> {
        let mut raw = GsapiRevision {
            product: ptr::null(),
            copyright: ptr::null(),
            revision: 0,
            revisiondate: 0,
        };
        let size = std::mem::size_of::<GsapiRevision>() as c_int;
        // SAFETY: `raw` is a properly sized, writable revision struct.
        let code = unsafe { gsapi_revision(&mut raw, size) };
        if code != 0 {
            return Err(interpreter_error(code, "gsapi_revision"));
        }

        let product = if raw.product.is_null() {
            "Ghostscript".to_string()
        } else {
            // SAFETY: gsapi_revision points `product` at a static NUL-terminated string.
            unsafe { CStr::from_ptr(raw.product) }
                .to_string_lossy()
                .into_owned()
        };

        Ok(Revision {
            product,
            revision: raw.revision as i64,
            revision_date: Some(raw.revisiondate as i64),
        })
    }
}

// ---------------------------------------------------------------------------
// Instance
// ---------------------------------------------------------------------------

/// A live `gsapi` instance. Exited (if needed) and deleted on drop.
struct LibraryInterpreter {
    instance: *mut c_void,
    /// `gsapi_init_with_args` was called and `gsapi_exit` is still owed.
    initialized: bool,
}

impl Interpreter for LibraryInterpreter {
    #[instrument(skip_all, fields(argc = args.len()))]
    fn initialize(&mut self, args: &[String]) -> Result<()> {
        let owned: Vec<CString> = args
            .iter()
            .map(|arg| {
                CString::new(arg.as_str()).map_err(|_| {
                    ArchivwerkError::InvalidSetting(format!(
                        "interpreter argument contains a NUL byte: {arg:?}"
                    ))
                })
            })
            .collect::<Result<_>>()?;
        let mut argv: Vec<*mut c_char> = owned.iter().map(|s| s.as_ptr() as *mut c_char).collect();
        let argc = c_int::try_from(argv.len()).map_err(|_| {
            ArchivwerkError::InvalidSetting("too many interpreter arguments".into())
        })?;

        self.initialized = true;
        // SAFETY: `argv` holds `argc` pointers into `owned`, which outlives the call.
        let code = unsafe { gsapi_init_with_args(self.instance, argc, argv.as_mut_ptr()) };

        if code == 0 || code == GS_ERROR_QUIT {
            Ok(())
        } else {
            Err(interpreter_error(code, "gsapi_init_with_args"))
        }
    }

    fn exit(&mut self) -> Result<()> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;

        // SAFETY: the instance is live until drop.
        let code = unsafe { gsapi_exit(self.instance) };
        if code == 0 || code == GS_ERROR_QUIT {
            Ok(())
        } else {
            Err(interpreter_error(code, "gsapi_exit"))
        }
    }
}

impl Drop for LibraryInterpreter {
    fn drop(&mut self) {
        if let Err(err) = self.exit() {
            warn!(error = %err, "gsapi_exit failed during teardown");
        }
        // SAFETY: the instance is live and is never used after this point.
        unsafe { gsapi_delete_instance(self.instance) };
        debug!("gsapi instance deleted");
    }
}
