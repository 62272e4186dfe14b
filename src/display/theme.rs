//! Light/dark theme signal and chart palettes
//!
//! The theme is owned elsewhere. The history view only observes it through
//! [`ThemeSignal`] and uses it to pick colours.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Light or dark rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}

/// Chart colours for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub line: &'static str,
    pub grid: &'static str,
    pub text: &'static str,
    pub background: &'static str,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        line: "#2196F3",
        grid: "#E0E0E0",
        text: "#424242",
        background: "#FFFFFF",
    };

    pub const DARK: Palette = Palette {
        line: "#FF9800",
        grid: "#374151",
        text: "#D1D5DB",
        background: "#111827",
    };

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::LIGHT,
            Theme::Dark => Self::DARK,
        }
    }
}

/// Parse `#RRGGBB` into components
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Callback invoked with the new theme on every change
pub type ThemeCallback = Box<dyn Fn(Theme) + Send + Sync>;

/// Handle returned by [`ThemeSignal::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A read-only, externally owned theme
pub trait ThemeSignal: Send + Sync {
    /// Theme right now
    fn current(&self) -> Theme;

    /// Register a change callback
    fn subscribe(&self, callback: ThemeCallback) -> SubscriptionId;

    /// Deregister a callback; unknown ids are ignored
    fn unsubscribe(&self, id: SubscriptionId);
}

/// In-process theme signal set explicitly (config, CLI flag, key press)
pub struct ManualTheme {
    current: RwLock<Theme>,
    listeners: Mutex<HashMap<u64, Arc<dyn Fn(Theme) + Send + Sync>>>,
    next_id: AtomicU64,
}

impl ManualTheme {
    pub fn new(theme: Theme) -> Self {
        Self {
            current: RwLock::new(theme),
            listeners: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Change the theme and notify subscribers if it actually changed
    pub fn set(&self, theme: Theme) {
        {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            if *current == theme {
                return;
            }
            *current = theme;
        }

        // Call outside the lock so callbacks may read the signal
        let callbacks: Vec<_> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        tracing::debug!("Theme changed to {}, notifying {} listeners", theme, callbacks.len());
        for callback in callbacks {
            callback(theme);
        }
    }

    pub fn toggle(&self) -> Theme {
        let next = self.current().toggled();
        self.set(next);
        next
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl ThemeSignal for ManualTheme {
    fn current(&self) -> Theme {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscribe(&self, callback: ThemeCallback) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::from(callback));
        SubscriptionId(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id.0);
    }
}

/// Passive subscription that caches the latest theme
///
/// Unsubscribes when dropped.
pub struct ThemeObserver {
    signal: Arc<dyn ThemeSignal>,
    id: SubscriptionId,
    cached: Arc<RwLock<Theme>>,
}

impl ThemeObserver {
    pub fn observe(signal: Arc<dyn ThemeSignal>) -> Self {
        let cached = Arc::new(RwLock::new(signal.current()));

        let sink = Arc::clone(&cached);
        let id = signal.subscribe(Box::new(move |theme| {
            *sink.write().unwrap_or_else(PoisonError::into_inner) = theme;
        }));

        Self { signal, id, cached }
    }

    pub fn theme(&self) -> Theme {
        *self.cached.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(self.theme())
    }
}

impl Drop for ThemeObserver {
    fn drop(&mut self) {
        self.signal.unsubscribe(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parse() {
        assert_eq!("Dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(" light ".parse::<Theme>(), Ok(Theme::Light));
        assert!("auto".parse::<Theme>().is_err());
    }

    #[test]
    fn test_palette_per_theme() {
        assert_eq!(Palette::for_theme(Theme::Light), Palette::LIGHT);
        assert_eq!(Palette::for_theme(Theme::Dark).line, "#FF9800");
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#FF9800"), Some((255, 152, 0)));
        assert_eq!(hex_to_rgb("FF9800"), None);
        assert_eq!(hex_to_rgb("#FF98"), None);
        assert_eq!(hex_to_rgb("#GG9800"), None);
    }

    #[test]
    fn test_observer_follows_signal() {
        let signal = Arc::new(ManualTheme::new(Theme::Light));
        let observer = ThemeObserver::observe(signal.clone());
        assert_eq!(observer.palette(), Palette::LIGHT);

        signal.set(Theme::Dark);
        assert_eq!(observer.theme(), Theme::Dark);
        assert_eq!(observer.palette(), Palette::DARK);

        assert_eq!(signal.toggle(), Theme::Light);
        assert_eq!(observer.theme(), Theme::Light);
    }

    #[test]
    fn test_observer_unsubscribes_on_drop() {
        let signal = Arc::new(ManualTheme::new(Theme::Dark));
        let observer = ThemeObserver::observe(signal.clone());
        assert_eq!(signal.listener_count(), 1);

        drop(observer);
        assert_eq!(signal.listener_count(), 0);

        // Changing the theme with no listeners is fine
        signal.set(Theme::Light);
        assert_eq!(signal.current(), Theme::Light);
    }
}
