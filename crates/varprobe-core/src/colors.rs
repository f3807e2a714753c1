//! Terminal styling for `PrintTracer` lines.

/// Escape sequences for each role a trace line uses. Every field is empty
/// when styling is off.
#[derive(Clone, Copy, Debug)]
pub struct Colors {
    /// Kinds and handle paths.
    pub blue: &'static str,
    /// Copied scalars.
    pub green: &'static str,
    /// `>` and `!` markers.
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Colors {
    pub const ON: Self = Self {
        blue: "\x1b[34m",
        green: "\x1b[32m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        blue: "",
        green: "",
        dim: "",
        reset: "",
    };
}
