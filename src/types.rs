use std::fmt;
use std::str::FromStr;

/// Formatting of the generated CSS.
///
/// `Nested` and `Compact` are the historical Sass styles; `Expanded` and
/// `Compressed` are the two styles the current Sass dialect defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStyle {
    /// Rendered exactly like `Expanded`; no indentation mirrors the source
    /// nesting.
    #[default]
    Nested,
    Compact,
    Expanded,
    Compressed,
}

impl FromStr for OutputStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nested" => Ok(OutputStyle::Nested),
            "compact" => Ok(OutputStyle::Compact),
            "expanded" => Ok(OutputStyle::Expanded),
            "compressed" => Ok(OutputStyle::Compressed),
            other => Err(format!(
                "invalid output_style: {other:?} (expected \"nested\", \"compact\", \"expanded\" or \"compressed\")"
            )),
        }
    }
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputStyle::Nested => "nested",
            OutputStyle::Compact => "compact",
            OutputStyle::Expanded => "expanded",
            OutputStyle::Compressed => "compressed",
        };
        f.write_str(s)
    }
}

/// What to do with source changes that arrive while a compile is running.
///
/// - `Coalesce`: collapse everything that arrives during the compile into a
///   single follow-up compile (default).
/// - `Serialize`: queue one follow-up compile per change batch, in arrival
///   order, bounded by `queue_length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusyPolicy {
    #[default]
    Coalesce,
    Serialize,
}

impl FromStr for BusyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coalesce" => Ok(BusyPolicy::Coalesce),
            "serialize" => Ok(BusyPolicy::Serialize),
            other => Err(format!(
                "invalid on_busy: {other} (expected \"coalesce\" or \"serialize\")"
            )),
        }
    }
}
