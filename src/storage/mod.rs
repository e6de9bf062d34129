pub mod postgres;
pub mod sqlite;
pub mod trait_def;

mod bounds;

pub use postgres::PostgresEventStore;
pub use sqlite::SqliteEventStore;
pub use trait_def::EventStore;
