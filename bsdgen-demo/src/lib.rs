//! # bsdgen Demo
//!
//! Types generated at build time from `schemas/demo.bsd.xml`.
//!
//! # Example
//! ```
//! use bsdgen_demo::{BinaryEncoder, Foo};
//!
//! let foo = Foo { items: vec![10, 20, 30] };
//! let bytes = foo.encode_to_vec().unwrap();
//! assert_eq!(bytes.len(), 16);
//! assert_eq!(Foo::decode(&mut bytes.as_slice()).unwrap(), foo);
//! ```

#[deny(unused_imports)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/generated.rs"));
}

/// The same types generated with one module per type.
#[deny(unused_imports)]
pub mod per_type {
    include!(concat!(env!("OUT_DIR"), "/types/mod.rs"));
}

pub use bsdgen_types::{BinaryEncoder, EncodingError, EncodingResult};
pub use generated::*;
