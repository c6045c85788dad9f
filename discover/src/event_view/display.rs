//! Chart display modes and the fallback chain used when a mode is disabled.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Upper bound on fallback steps while resolving a display mode.
pub const MAX_DISPLAY_FALLBACK_STEPS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Default,
    Previous,
    Top5,
    Daily,
    DailyTop5,
    Bar,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 6] = [
        DisplayMode::Default,
        DisplayMode::Previous,
        DisplayMode::Top5,
        DisplayMode::Daily,
        DisplayMode::DailyTop5,
        DisplayMode::Bar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Default => "default",
            DisplayMode::Previous => "previous",
            DisplayMode::Top5 => "top5",
            DisplayMode::Daily => "daily",
            DisplayMode::DailyTop5 => "dailytop5",
            DisplayMode::Bar => "bar",
        }
    }
}

impl FromStr for DisplayMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisplayMode::ALL.into_iter().find(|m| m.as_str() == s).ok_or(())
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A display mode and whether the current view allows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayOption {
    pub mode: DisplayMode,
    pub disabled: bool,
}

/// Where to go when a display mode is disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFallbacks {
    next: HashMap<DisplayMode, DisplayMode>,
}

impl DisplayFallbacks {
    /// A table with no fallbacks.
    pub fn empty() -> Self {
        Self { next: HashMap::new() }
    }

    pub fn with(mut self, from: DisplayMode, to: DisplayMode) -> Self {
        self.next.insert(from, to);
        self
    }

    pub fn get(&self, mode: DisplayMode) -> Option<DisplayMode> {
        self.next.get(&mode).copied()
    }
}

impl Default for DisplayFallbacks {
    fn default() -> Self {
        Self::empty()
            .with(DisplayMode::Bar, DisplayMode::Default)
            .with(DisplayMode::DailyTop5, DisplayMode::Daily)
            .with(DisplayMode::Daily, DisplayMode::Default)
            .with(DisplayMode::Previous, DisplayMode::Default)
            .with(DisplayMode::Top5, DisplayMode::Default)
    }
}

/// Resolve `requested` against the enabled options.
///
/// Follows the fallback table at most [`MAX_DISPLAY_FALLBACK_STEPS`] times
/// and ends on [`DisplayMode::Default`] when no enabled mode is reached.
pub fn resolve_display_mode(
    requested: DisplayMode,
    options: &[DisplayOption],
    fallbacks: &DisplayFallbacks,
) -> DisplayMode {
    let enabled = |mode: DisplayMode| options.iter().any(|o| o.mode == mode && !o.disabled);

    let mut mode = requested;
    for _ in 0..MAX_DISPLAY_FALLBACK_STEPS {
        if enabled(mode) {
            return mode;
        }
        match fallbacks.get(mode) {
            Some(next) => {
                tracing::debug!(from = %mode, to = %next, "display mode disabled, falling back");
                mode = next;
            }
            None => break,
        }
    }
    DisplayMode::Default
}
