//! Optional live-location capability.
//!
//! Location updates themselves reach the controller as host events; this
//! trait only covers authorization and starting the update stream.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Location authorization state reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    NotDetermined,
    Restricted,
    Denied,
    AuthorizedWhenInUse,
    AuthorizedAlways,
}

impl AuthorizationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotDetermined => "not_determined",
            Self::Restricted => "restricted",
            Self::Denied => "denied",
            Self::AuthorizedWhenInUse => "authorized_when_in_use",
            Self::AuthorizedAlways => "authorized_always",
        }
    }

    pub fn is_authorized(self) -> bool {
        matches!(self, Self::AuthorizedWhenInUse | Self::AuthorizedAlways)
    }
}

/// Location access was refused by the user or by policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionDenied {
    pub status: AuthorizationStatus,
}

impl Display for PermissionDenied {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "location permission denied ({})", self.status.as_str())
    }
}

impl Error for PermissionDenied {}

/// Platform location manager.
pub trait LocationProvider: Send + Sync {
    fn authorization_status(&self) -> AuthorizationStatus;
    /// Asks for when-in-use authorization; the answer arrives later as a
    /// host event.
    fn request_permission(&self);
    fn start_updates(&self);
}
