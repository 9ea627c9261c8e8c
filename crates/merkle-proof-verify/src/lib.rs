#![doc = include_str!("../README.md")]

pub mod error;
pub mod hasher;
pub mod verify;

pub use error::{Result, VerifyError};
pub use hasher::{DigestHasher, HashAlgorithm, Md5Hasher, Sha256Hasher};
pub use verify::{compute_root, verify, verify_strict};
