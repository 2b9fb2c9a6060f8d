//! Domain layer for Naming Guardian
//!
//! CDD Principle: Domain Model - Declarations, locations and violations in plain values
//! - Independent of parsers, file systems and output formats
//! - Expresses the ubiquitous language of names, anchors and fix-its

pub mod declarations;
pub mod source;
pub mod violations;

pub use declarations::*;
pub use source::*;
pub use violations::*;
