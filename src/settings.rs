//! Switches that decide how much checking the wrappers do.

use serde::{Deserialize, Serialize};

/// Configuration read once when a `Context` is created.
///
/// The defaults follow the build profile: debug builds validate bindings and emit
/// diagnostics, release builds trust the caller. The `validation` cargo feature
/// turns validation on regardless of the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Checks that an object is the current binding of its target before running
    /// operations that implicitly act on "the bound object". The driver is
    /// re-queried for every check, so bindings made behind our back are noticed.
    pub validation: bool,
    /// Traces object creation, deletion and every bind through the `log` facade.
    pub diagnostics: bool,
    /// Refuses to use entry points the driver does not advertise in its
    /// capability table.
    pub check_dependencies: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            validation: cfg!(debug_assertions) || cfg!(feature = "validation"),
            diagnostics: cfg!(debug_assertions),
            check_dependencies: true,
        }
    }
}

impl Settings {
    /// Settings with every check enabled.
    pub fn validated() -> Self {
        Settings {
            validation: true,
            diagnostics: true,
            check_dependencies: true,
        }
    }

    /// Settings that trust the caller completely.
    pub fn unchecked() -> Self {
        Settings {
            validation: false,
            diagnostics: false,
            check_dependencies: false,
        }
    }
}
