use std::ops::Deref;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::database::User;

#[derive(Default, Clone)]
pub struct ContextData {
    pub user: Option<User>,
}

/// Shared per-request state. The auth middleware fills it in and handlers
/// read from it, so it has to be cheap to clone and safe to share.
#[derive(Default, Clone)]
pub struct RequestContext(Arc<RwLock<ContextData>>);

impl RequestContext {
    pub async fn set_user(&self, user: User) {
        let mut guard = self.0.write().await;
        guard.user = Some(user);
    }

    pub async fn user(&self) -> Option<User> {
        self.0.read().await.deref().clone().user
    }
}
