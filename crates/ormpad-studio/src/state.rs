use std::sync::Arc;

use ormpad_engine::{populate, Database, Engine};
use ormpad_schema::{bookstore, describe_schema, EntityInfo, SchemaRegistry};
use parking_lot::Mutex;

use crate::config::StudioConfig;
use crate::error::Result;

/// Application state shared across all routes.
///
/// One engine per process, behind a mutex: a single snippet executes at
/// a time, and each run drains its own query trace.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Mutex<Engine>>,
    /// Introspected field listing for the sidebar, computed once.
    pub schema: Arc<Vec<EntityInfo>>,
    pub config: StudioConfig,
}

impl AppState {
    pub fn new(config: StudioConfig) -> Result<Self> {
        let schema = bookstore();
        let db = match &config.database {
            Some(path) => Database::open(path)?,
            None => Database::open_in_memory()?,
        };
        db.create_tables(&schema)?;
        if config.seed {
            populate(&db)?;
        }

        let registry = SchemaRegistry::new().with_app(schema.clone());
        let listing = describe_schema(&registry, "bookstore");

        Ok(Self {
            engine: Arc::new(Mutex::new(Engine::new(db, schema))),
            schema: Arc::new(listing),
            config,
        })
    }
}
