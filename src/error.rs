//! Error types for geometry decoding and clipping.
//!
//! Only two failure surfaces exist in the core: malformed input blobs and a
//! polyline clip that fails to converge. Callers that process many rows use
//! [`Error::kind`] to decide their skip-and-continue policy without matching
//! on individual variants.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding a GeoPackage blob or clipping its geometry.
#[derive(Error, Debug)]
pub enum Error {
    #[error("bad GeoPackage magic {0:02x?} (expected \"GP\")")]
    BadMagic([u8; 2]),

    #[error("unsupported GeoPackage binary version {0}")]
    UnsupportedVersion(u8),

    #[error("invalid envelope contents indicator {0}")]
    InvalidEnvelope(u8),

    #[error("invalid WKB byte order marker {0} (expected 0 or 1)")]
    InvalidByteOrder(u8),

    #[error("unsupported WKB geometry type {code} in blob {blob_hex}")]
    UnsupportedGeometryType { code: u32, blob_hex: String },

    #[error("truncated blob: need {needed} bytes at offset {offset}, blob is {len} bytes")]
    Truncated {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("segment clipping did not converge within {0} iterations")]
    ClipNonConvergence(usize),
}

/// Coarse classification of [`Error`] for per-row logging/skip policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad envelope, unknown geometry type or truncated buffer.
    MalformedInput,
    /// The polyline clipper exceeded its iteration cap.
    ClipNonConvergence,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ClipNonConvergence(_) => ErrorKind::ClipNonConvergence,
            _ => ErrorKind::MalformedInput,
        }
    }
}
