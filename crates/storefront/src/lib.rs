//! Tote Storefront library.
//!
//! Everything between the cart and the backend: the Supabase client, the
//! checkout workflow, the auth and catalog services, configuration and error
//! reporting. Front ends (the `tote` CLI, tests) drive it through
//! [`state::AppState`] or build the services directly over any
//! [`remote::RemoteDataService`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod remote;
pub mod services;
pub mod state;
pub mod supabase;
pub mod telemetry;
