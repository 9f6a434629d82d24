use std::io::{Read, Write};

use crate::error::Result;
use crate::target::Target;

/// Opens one fresh stream to a collector per call.
///
/// Implementations must never hand out a shared or pooled stream: the caller
/// owns the returned stream for exactly one request/response exchange and
/// closes it by dropping it.
pub trait Connector {
    /// The connected stream type.
    type Stream: Read + Write;

    /// Open a new connection to `target` (blocking).
    fn connect(&self, target: &Target) -> Result<Self::Stream>;
}

impl<C: Connector + ?Sized> Connector for &C {
    type Stream = C::Stream;

    fn connect(&self, target: &Target) -> Result<Self::Stream> {
        (**self).connect(target)
    }
}
