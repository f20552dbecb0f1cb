//! # Extension Traits
//!
//! Convenience methods for callers of the dispatch layer.
//!
//! ## Overview
//!
//! Every dispatched call may answer [`VolError::Unsupported`]. That answer is
//! how optional backend features are discovered, so treating it like any
//! other error is usually wrong. [`ProbeExt`] separates the two outcomes.
//!
//! | Method | `Ok(v)` | Unsupported | Other error |
//! |--------|---------|-------------|-------------|
//! | [`probe`](ProbeExt::probe) | `Ok(Some(v))` | `Ok(None)` | `Err(e)` |
//! | [`supported`](ProbeExt::supported) | `Ok(true)` | `Ok(false)` | `Err(e)` |

use crate::error::{Result, VolError};

/// Capability-probe helpers for dispatch results.
///
/// # Example
///
/// ```rust
/// use h5vol_backend::{Domain, ProbeExt, Verb, VolError};
///
/// let missing: Result<u32, VolError> = Err(VolError::Unsupported {
///     domain: Domain::Dataset,
///     verb: Verb::Specific,
/// });
/// assert_eq!(missing.probe().unwrap(), None);
///
/// let failed: Result<u32, VolError> = Err(VolError::Args("bad selection".into()));
/// assert!(failed.probe().is_err());
///
/// let done: Result<u32, VolError> = Ok(4);
/// assert_eq!(done.probe().unwrap(), Some(4));
/// ```
pub trait ProbeExt<T> {
    /// Turn an unsupported answer into `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Every error other than the unsupported answers.
    fn probe(self) -> Result<Option<T>>;

    /// Whether the operation is supported, discarding its value.
    ///
    /// # Errors
    ///
    /// Every error other than the unsupported answers.
    fn supported(self) -> Result<bool>
    where
        Self: Sized,
    {
        self.probe().map(|v| v.is_some())
    }
}

impl<T> ProbeExt<T> for std::result::Result<T, VolError> {
    fn probe(self) -> Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.is_unsupported() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Domain, Verb};

    fn unsupported() -> Result<()> {
        Err(VolError::Unsupported {
            domain: Domain::Link,
            verb: Verb::Optional,
        })
    }

    #[test]
    fn probe_separates_outcomes() {
        assert_eq!(unsupported().probe().unwrap(), None);
        assert_eq!(Ok::<_, VolError>(()).probe().unwrap(), Some(()));
        assert!(Err::<(), _>(VolError::BadType("x".into())).probe().is_err());
    }

    #[test]
    fn request_unsupported_is_probed_too() {
        let r: Result<()> = Err(VolError::RequestUnsupported { operation: "wait" });
        assert!(!r.supported().unwrap());
    }

    #[test]
    fn supported_reports_presence() {
        assert!(!unsupported().supported().unwrap());
        assert!(Ok::<_, VolError>(1).supported().unwrap());
    }
}
