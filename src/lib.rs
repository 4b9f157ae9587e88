pub mod app;
pub mod config;
pub mod logging;

pub mod domain {
    pub mod entities {
        pub mod column;
        pub mod filter;
        pub mod form;
        pub mod page;
        pub mod product;
        pub mod record;
        pub mod user;
    }
}

pub mod infra {
    pub mod mock;
    pub mod sqlite {
        pub mod queries;
        pub mod repo;
        pub mod schema;
    }
    pub mod url {
        pub mod location;
        pub mod query_codec;
    }
}

pub mod usecase {
    pub mod ports {
        pub mod query_store;
        pub mod repo;
    }
    pub mod services {
        pub mod edit_service;
        pub mod query_service;
        pub mod search_debounce;
        pub mod table_controller;
    }
}

pub mod ui {
    pub mod screens;
    pub mod state {
        pub mod app_state;
    }
}

#[cfg(test)]
mod tests;
