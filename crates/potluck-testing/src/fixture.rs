//! Shared request fixtures.

/// A 1x1 transparent PNG as the data URL the recipe and avatar endpoints
/// accept.
pub const PNG_1X1_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";
