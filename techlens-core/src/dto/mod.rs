//! Data Transfer Objects for the analysis API
//!
//! Request and error bodies that only exist on the wire. Records the API
//! returns live in [`crate::domain`].

pub mod technology;
