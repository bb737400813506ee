//! Well-known avatar barcodes used as round defaults.

pub const TALL: &str = "avatar.tall";
pub const LIGHT: &str = "avatar.light";

pub const DEFAULT_SEEKER_OVERRIDE: &str = TALL;
pub const DEFAULT_HIDER_OVERRIDE: &str = LIGHT;
