//! Coverage index tests over coverage pages written to disk.

pub mod tests_watch;
