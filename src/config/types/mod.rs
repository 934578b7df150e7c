//! Configuration utility types.
//!
//! | Module   | Purpose                                      |
//! |----------|----------------------------------------------|
//! | `error`  | Validation diagnostics                       |
//! | `field`  | Field paths named in diagnostics             |

mod error;
mod field;

pub use error::{ConfigDiagnostic, ConfigDiagnostics};
pub use field::FieldPath;
