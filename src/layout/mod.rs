//! Object key layout
//!
//! Every artifact lives at `{prefix}/{YYYYMM}/{artifact}` where the artifact
//! name embeds the run stamp:
//!
//! - bronze: `monday_raw_{stamp}.json`
//! - silver: `monday_items_{stamp}.parquet`
//! - gold: `monday_gold_{stamp}.parquet`

mod types;

pub use types::{Layer, LayerLocation, Period, Stamp, PERIOD_FORMAT, STAMP_FORMAT};
