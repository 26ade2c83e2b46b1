//! CLI module for Media Fetch Gateway
//!
//! Subcommands:
//! - `serve`: HTTP API (video metadata, image conversion, uploads)
//! - `resolve`: resolve one URL and print the normalized metadata

pub mod resolve;
pub mod serve;

use clap::{Parser, Subcommand};

/// Media Fetch Gateway - video metadata resolution and image conversion
#[derive(Parser)]
#[command(name = "media-fetch-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Resolve a single video URL and print its metadata as JSON
    Resolve(resolve::ResolveArgs),
}
