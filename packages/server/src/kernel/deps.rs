//! Server dependencies shared by every request handler
//!
//! Built once at startup from a concrete [`CaseStore`]; handlers only see
//! the trait object, so tests swap in [`MemoryCaseStore`].
//!
//! [`MemoryCaseStore`]: crate::kernel::store::MemoryCaseStore

use std::sync::Arc;

use crate::domains::cases::CaseLifecycle;
use crate::domains::ngos::NgoMatcher;
use crate::kernel::store::CaseStore;

#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn CaseStore>,
    pub lifecycle: Arc<CaseLifecycle>,
    pub matcher: Arc<NgoMatcher>,
}

impl ServerDeps {
    pub fn new(store: Arc<dyn CaseStore>, nearby_radius_km: f64) -> Self {
        Self {
            lifecycle: Arc::new(CaseLifecycle::new(store.clone())),
            matcher: Arc::new(NgoMatcher::new(store.clone(), nearby_radius_km)),
            store,
        }
    }
}
