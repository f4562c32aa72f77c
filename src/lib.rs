pub(crate) mod data {
    pub(crate) mod models {
        pub(crate) mod host_channel {
            pub(crate) mod purchase_map_model;
        }
    }
    pub(crate) mod repositories {
        pub(crate) mod purchase_repository_impl;
    }
}

pub mod domain {
    pub mod entities {
        pub mod purchase;
    }
    pub mod repositories {
        pub mod purchase_repository;
    }
}

pub mod config;
pub mod errors;
pub mod util;
