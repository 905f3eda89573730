pub mod import_django;
pub mod initdb;
pub mod migrate_and_serve;
pub mod serve;

pub use import_django::import_django;
pub use initdb::init_database;
pub use migrate_and_serve::migrate_and_serve;
pub use serve::serve;
