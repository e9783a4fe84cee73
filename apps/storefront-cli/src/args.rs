//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//! - `--config <path>`: Use this config file instead of the platform default
//! - `--data-dir <path>`: Persist under this directory
//! - `--memory`: Use in-memory storage (nothing survives the process)
//! - `--prefers-dark`: Report the system color scheme as dark
//! - `--debug`: Enable debug logging

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use storefront_core::{ProductId, ThemePreference};

/// Storefront - inspect and drive the storefront's persisted client state
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: platform config dir / storefront.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Data directory for persisted stores
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keep state in memory only
    #[arg(long, global = true, conflicts_with = "data_dir")]
    pub memory: bool,

    /// Report the system color scheme as dark
    #[arg(long, global = true)]
    pub prefers_dark: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },

    /// Saved products
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },

    /// Search the catalog, or manage recent searches
    Search(SearchArgs),

    /// Theme preference
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// List the product catalog
    Catalog,
}

#[derive(Subcommand, Debug)]
pub enum CartAction {
    /// Show items and totals
    Show,

    /// Add a product (increments quantity if present)
    Add {
        id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },

    /// Remove a product
    Remove { id: ProductId },

    /// Set a line's quantity (0 removes it)
    Set { id: ProductId, quantity: i64 },

    /// Empty the cart
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum WishlistAction {
    Show,
    Add { id: ProductId },
    Remove { id: ProductId },
    /// Save if absent, unsave if present
    Toggle { id: ProductId },
    Clear,
}

#[derive(Args, Debug)]
#[command(args_conflicts_with_subcommands = true)]
pub struct SearchArgs {
    #[command(subcommand)]
    pub action: Option<SearchAction>,

    /// Query to run (debounced like a keystroke, then settled)
    pub query: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum SearchAction {
    /// List recent searches, newest first
    Recent,

    /// Forget all recent searches
    ClearRecent,

    /// Forget one recent search
    Forget { query: String },
}

#[derive(Subcommand, Debug)]
pub enum ThemeAction {
    /// Show preference, system scheme and the resolved scheme
    Show,

    /// Set the preference: light, dark or system
    Set { preference: ThemePreference },
}
