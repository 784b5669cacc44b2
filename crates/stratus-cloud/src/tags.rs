//! Message tags of the cloud model.
//!
//! The engine-level tags (CIS registration, urgent wakeup) live in
//! [`stratus_core::tags`]; the values here are disjoint from them.

use stratus_core::Tag;

/// Asks a datacenter to place a VM; carries a `VmCreateRequest`.
pub const VM_CREATE: Tag = 31;

/// Datacenter reply to `VM_CREATE`; carries a `VmCreateAck`.
pub const VM_CREATE_ACK: Tag = 32;

/// Asks a datacenter to destroy a VM; carries a `VmDestroyRequest`.
pub const VM_DESTROY: Tag = 33;

/// Submits a cloudlet to a datacenter; carries a `CloudletSubmit`.
pub const CLOUDLET_SUBMIT: Tag = 41;

/// Returns a completed or canceled cloudlet to its broker; carries a
/// `CloudletReturn`.
pub const CLOUDLET_RETURN: Tag = 42;

/// Pauses a submitted cloudlet; carries a `CloudletControl`.
pub const CLOUDLET_PAUSE: Tag = 43;

/// Resumes a paused cloudlet; carries a `CloudletControl`.
pub const CLOUDLET_RESUME: Tag = 44;

/// Cancels a submitted cloudlet; carries a `CloudletControl`.
pub const CLOUDLET_CANCEL: Tag = 45;

/// Datacenter self-message triggering a processing update of its hosts.
pub const UPDATE_PROCESSING: Tag = 51;
