//! Configuration written into the generated project

pub mod generator;

pub use generator::{
    lan_address, patch_dev_host, patch_tsconfig, rewrite_file, server_url, CapacitorSettings,
};
