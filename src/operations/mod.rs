//! Concrete representations of operations.
//!
//! Every representation here is wrapped by
//! [`Operation`](crate::operation::Operation), which owns the
//! cross-representation equality and hashing contract. The structs are
//! public so that representation-specific structure (projection
//! indices, Sperner families, dispatch vectors) stays accessible.

mod binary;
mod explicit;
mod minmax;
mod projection;
mod sharp;

pub use binary::BinaryOperation;
pub use explicit::ExplicitOperation;
pub use minmax::MinMax;
pub use projection::Projection;
pub use sharp::SharpTernary;
