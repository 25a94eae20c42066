pub mod query;
pub mod realtime;
pub mod rest;
pub mod service;
pub mod subscription;
pub mod supabase;

#[cfg(test)]
pub mod fake;

pub use query::{ChangeFilter, Direction, OrderBy, SelectQuery};
pub use service::RemoteDataService;
pub use subscription::{ChangeCallback, LossNotifier, Subscription};
pub use supabase::SupabaseService;
