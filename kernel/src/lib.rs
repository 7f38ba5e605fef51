pub use crate::error::*;

mod cache;
mod database;
mod entity;
mod error;
mod modify;
mod query;
mod rule;

#[cfg(feature = "prelude")]
pub mod prelude {
    pub mod entity {
        pub use crate::entity::*;
    }
    pub mod rule {
        pub use crate::rule::*;
    }
}

#[cfg(feature = "interface")]
pub mod interface {
    pub mod cache {
        pub use crate::cache::*;
    }
    pub mod database {
        pub use crate::database::*;
    }
    pub mod query {
        pub use crate::query::*;
    }
    pub mod update {
        pub use crate::modify::*;
    }
}
