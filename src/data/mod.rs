/// Data layer: core types, loading, filtering, aggregation and export.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → typed, validated Dataset (once)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  (year, month) equality → BookingView
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────────────┐
///   │ aggregate / correlation │  summary, top-k ADR, segments, trend, corr
///   └─────────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  BookingView → CSV
///   └──────────┘
/// ```

pub mod aggregate;
pub mod correlation;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
