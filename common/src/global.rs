use std::sync::Arc;

use crate::context::Context;

/// Access to the shutdown context of the process.
pub trait GlobalCtx {
    fn ctx(&self) -> &Context;
}

/// Access to any config section the global state can provide.
pub trait GlobalConfig {
    #[inline(always)]
    fn config<C>(&self) -> &C
    where
        Self: GlobalConfigProvider<C>,
    {
        GlobalConfigProvider::provide_config(self)
    }
}

pub trait GlobalConfigProvider<C> {
    fn provide_config(&self) -> &C;
}

/// Access to the shared database pool.
pub trait GlobalDb {
    fn db(&self) -> &Arc<sqlx::PgPool>;
}
