//! Logging macros for skeleton-pages
//!
//! Thin wrappers over [`tracing`] events with the `skeleton` target, so
//! applications can filter list activity with a single directive
//! (`RUST_LOG=skeleton=debug`).
//!
//! | Macro | Level |
//! |-------|-------|
//! | `debug_log!` | `DEBUG` |
//! | `info_log!` | `INFO` |
//! | `warn_log!` | `WARN` |
//! | `error_log!` | `ERROR` |
//!
//! ## Example
//!
//! ```ignore
//! use skeleton_pages::{debug_log, warn_log};
//!
//! debug_log!(index, "record appended");
//! warn_log!("ignored write to reserved field {}", name);
//! ```

/// Logs a debug event under the `skeleton` target
#[macro_export]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::__tracing::debug!(target: "skeleton", $($arg)*);
	}};
}

/// Logs an info event under the `skeleton` target
#[macro_export]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::__tracing::info!(target: "skeleton", $($arg)*);
	}};
}

/// Logs a warning under the `skeleton` target
#[macro_export]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::__tracing::warn!(target: "skeleton", $($arg)*);
	}};
}

/// Logs an error under the `skeleton` target
#[macro_export]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::__tracing::error!(target: "skeleton", $($arg)*);
	}};
}

#[cfg(test)]
mod tests {
	use rstest::rstest;
	// Import macros from crate root
	use crate::{debug_log, error_log, info_log, warn_log};

	#[rstest]
	fn test_logging_macros_compile() {
		debug_log!("Debug message: {}", 42);
		info_log!("Info message: {}", "test");
		warn_log!("Warning message: {:?}", vec![1, 2, 3]);
		error_log!("Error message: {}", "error");
	}

	#[rstest]
	fn test_logging_macros_with_fields() {
		let index = 3usize;
		debug_log!(index, "record appended");
		warn_log!(field = "index", "ignored write");
	}

	#[rstest]
	fn test_logging_with_subscriber() {
		let subscriber = tracing_subscriber::fmt()
			.with_max_level(tracing::Level::DEBUG)
			.with_test_writer()
			.finish();
		tracing::subscriber::with_default(subscriber, || {
			info_log!("Simple info");
			error_log!("Simple error");
		});
	}
}
