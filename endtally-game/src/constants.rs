//! Shared defaults.

/// Storage key the legacy app used for the one active game.
pub const DEFAULT_SAVE_KEY: &str = "currentGame";

/// Display label for side A.
pub const DEFAULT_SIDE_A_LABEL: &str = "Home";

/// Display label for side B.
pub const DEFAULT_SIDE_B_LABEL: &str = "Away";

/// Most points one side can take in a curling end (eight stones each).
pub const MAX_END_MARGIN: u32 = 8;
