use crate::metadata::CertificateMetadata;
use crate::request::CallerIdentity;

/// Decides whether a caller may add or remove users, groups or roles on a
/// certificate.
///
/// The decision depends only on the caller and the certificate's recorded
/// owner (`cert_owner_ntid`):
///
/// | caller    | owner unset/empty | owner == caller | owner != caller |
/// |-----------|-------------------|-----------------|-----------------|
/// | admin     | grant             | grant           | deny            |
/// | non-admin | deny              | grant           | deny            |
///
/// Owner comparison ignores case. Missing metadata always denies.
///
/// An admin is denied on a certificate owned by someone else: a recorded
/// owner takes precedence over the admin flag.
///
/// # Examples
///
/// ```
/// use certificate_access::{AccessDecisionEngine, CallerIdentity, CertificateMetadata};
///
/// let engine = AccessDecisionEngine::new();
/// let cert = CertificateMetadata::new("web.example.com", 7).with_owner("Alice");
///
/// assert!(engine.has_add_or_remove_permission(&CallerIdentity::user("alice"), Some(&cert)));
/// assert!(!engine.has_add_or_remove_permission(&CallerIdentity::admin("root"), Some(&cert)));
/// assert!(!engine.has_add_or_remove_permission(&CallerIdentity::admin("root"), None));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessDecisionEngine {
    _private: (),
}

impl AccessDecisionEngine {
    /// Creates the engine.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Returns true if `caller` may change the access bindings of the
    /// certificate described by `metadata`.
    pub fn has_add_or_remove_permission(
        &self,
        caller: &CallerIdentity,
        metadata: Option<&CertificateMetadata>,
    ) -> bool {
        let Some(metadata) = metadata else {
            return false;
        };

        if caller.is_admin {
            admin_may_modify(caller, metadata)
        } else {
            owner_may_modify(caller, metadata)
        }
    }
}

// Unowned certificates (legacy records, or ones an admin created) are open
// to every admin.
fn admin_may_modify(caller: &CallerIdentity, metadata: &CertificateMetadata) -> bool {
    match metadata.owner() {
        None => true,
        Some(owner) => caller.is_named(owner),
    }
}

fn owner_may_modify(caller: &CallerIdentity, metadata: &CertificateMetadata) -> bool {
    metadata
        .cert_owner_ntid
        .as_deref()
        .is_some_and(|owner| caller.is_named(owner))
}
