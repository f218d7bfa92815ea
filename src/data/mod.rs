/// Data layer: core types, loading, and windowing.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RdfTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ RdfTable  │  r, g(r) columns in file order
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  g(r)·4πr², keep r_min ≤ r ≤ r_max → Vec<ShellPoint>
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;

#[cfg(test)]
pub mod fixtures;
