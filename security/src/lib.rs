// security/src/lib.rs

//! Advisory access control for Care Sync: which records a doctor is shown,
//! the explicit session value, and the (non-enforcing) view-only key filter.

pub mod policy;
pub mod session;
pub mod view_only;

pub use policy::{access_labels, has_direct_access, has_specialization_access, is_accessible, is_owner, AccessLabel};
pub use session::Session;
pub use view_only::{KeyChord, ViewOnlyGuard, ViewerEvent};
