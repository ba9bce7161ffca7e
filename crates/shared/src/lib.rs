//! Types and rules shared by the directory client and its frontends.

pub mod domain;
pub mod error;
pub mod html;
pub mod validation;
