//! Query-string state.
//!
//! The [`QueryParamStore`] is the single source of truth for a table's
//! refinement params. The codec, dispatcher and scheduler are the pieces it
//! is built from.

pub mod codec;
pub mod dispatcher;
pub mod options;
pub mod scheduler;
pub mod store;

// Re-export for convenience
pub use codec::QueryMap;
pub use dispatcher::{Dispatcher, Listener, SubscriptionId};
pub use options::{QueryOptions, Transform, Transforms, DEFAULT_PAGE_KEY};
pub use scheduler::{MicrotaskQueue, Scheduler, Task};
pub use store::{QueryContext, QueryParamStore, WeakQueryParamStore};
