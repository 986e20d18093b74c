// Fallback PDF layout: font metrics, greedy wrapping and the paginated writer
// used when the browser render is unavailable.

pub mod font_metrics;
pub mod wrap;
pub mod writer;
