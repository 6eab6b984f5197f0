//! Shared constants: cookie name, pagination defaults, display colors.

use rand::seq::SliceRandom;

/// Name of the cookie carrying the identity token on HTTP routes.
pub const AUTH_COOKIE: &str = "_authToken";

/// Default page number for message listing.
pub const DEFAULT_PAGE: u32 = 1;

/// Canonical default page size for message listing.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest accepted page size for message listing.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Palette of display colors assigned to new accounts.
const COLOR_PALETTE: &[&str] = &[
    "#ff0000", // red
    "#00ff00", // green
    "#0000ff", // blue
    "#ffff00", // yellow
    "#ffa500", // orange
    "#800080", // purple
    "#ff69b4", // hot pink
    "#ffc0cb", // light pink
    "#dda0dd", // plum
    "#ff1493", // deep pink
    "#add8e6", // light blue
];

/// Pick a random display color for a new account.
pub fn random_color() -> String {
    let mut rng = rand::thread_rng();
    COLOR_PALETTE
        .choose(&mut rng)
        .copied()
        .unwrap_or("#ff0000")
        .to_string()
}
