//! Hetzner Cloud API client for hcloud-reassign
//!
//! This crate implements the [`CloudApi`](hcloud_reassign_cloud::CloudApi)
//! trait on top of the Hetzner Cloud REST API.
//! Uses Bearer token authentication.
//!
//! # Example
//!
//! ```ignore
//! use hcloud_reassign_cloud::CloudApi;
//! use hcloud_reassign_hetzner::{make_client, DEFAULT_API_URL};
//!
//! let client = make_client("my-token", DEFAULT_API_URL)?;
//!
//! let server = client.find_server_by_name("srv-b").await?;
//! let ip = client.find_floating_ip_by_name("web-ip").await?;
//! ```

mod api;
pub mod client;

pub use client::{HetznerClient, make_client};
pub use hcloud_reassign_cloud::DEFAULT_API_URL;
