//! Criterion benchmarks for `faultline`; see `benches/`.
