use std::sync::Arc;

use crate::db::Collections;
use crate::notify::NotificationSink;

#[derive(Clone)]
pub struct AppState {
    pub collections: Collections,
    pub notifier: Arc<dyn NotificationSink>,
}
