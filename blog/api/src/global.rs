use std::sync::Arc;

use common::context::Context;

use crate::config::{ApiConfig, AppConfig};

pub trait BlogGlobal:
    common::global::GlobalCtx
    + common::global::GlobalConfigProvider<ApiConfig>
    + common::global::GlobalDb
    + common::global::GlobalConfig
    + Send
    + Sync
    + 'static
{
}

impl<T> BlogGlobal for T where
    T: common::global::GlobalCtx
        + common::global::GlobalConfigProvider<ApiConfig>
        + common::global::GlobalDb
        + common::global::GlobalConfig
        + Send
        + Sync
        + 'static
{
}

pub struct GlobalState {
    pub ctx: Context,
    pub config: AppConfig,
    pub db: Arc<sqlx::PgPool>,
}

impl GlobalState {
    pub fn new(config: AppConfig, db: Arc<sqlx::PgPool>, ctx: Context) -> Self {
        Self { ctx, config, db }
    }
}

impl common::global::GlobalCtx for GlobalState {
    fn ctx(&self) -> &Context {
        &self.ctx
    }
}

impl common::global::GlobalConfig for GlobalState {}

impl common::global::GlobalConfigProvider<ApiConfig> for GlobalState {
    #[inline(always)]
    fn provide_config(&self) -> &ApiConfig {
        &self.config.api
    }
}

impl common::global::GlobalDb for GlobalState {
    fn db(&self) -> &Arc<sqlx::PgPool> {
        &self.db
    }
}
