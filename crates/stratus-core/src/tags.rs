//! Control tags used by the engine and the Cloud Information Service.

use crate::event::Tag;

/// Registers the sending entity in the CIS resource directory.
pub const REGISTER_RESOURCE: Tag = 1;

/// Asks the CIS for the list of registered resource entities.
pub const RESOURCE_LIST_REQUEST: Tag = 2;

/// CIS reply carrying a [`ResourceList`](crate::cis::ResourceList) payload.
pub const RESOURCE_LIST_RESPONSE: Tag = 3;

/// Delivered to a waiting entity regardless of its wait predicate.
pub const URGENT_WAKEUP: Tag = 9999;
