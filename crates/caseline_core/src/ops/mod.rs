//! Set-style operations over period collections.
//!
//! Built on `Period` alone; no record or timeline knowledge lives here.

pub mod period_set;
