//! Well-known preference keys shared by the application windows.
//!
//! Each window persists its bounds with
//! [`set_rect`](crate::PrefStore::set_rect) under one of these names.

/// Main window bounds.
pub const MAIN_WINDOW: &str = "forms-main";

/// Preferences dialog bounds.
pub const PREF_WINDOW: &str = "forms-pref";

/// Debug log window bounds.
pub const DEBUG_WINDOW: &str = "forms-debug";
