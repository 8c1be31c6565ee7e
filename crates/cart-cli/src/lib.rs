//! # cart-cli
//!
//! Terminal front end for the storefront cart page.
//!
//! This crate provides:
//! - `cart-page` subcommands to show the cart, change quantities, remove
//!   items and check out
//! - Terminal implementations of the script loader, payment widget and host
//!   page collaborators
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `show [--html]` | Print the cart (default) |
//! | `set-qty <id> <n>` | Set a quantity; `n <= 0` removes the item |
//! | `increment <id>` / `decrement <id>` | Stepper buttons |
//! | `remove <id>` | Remove an item |
//! | `checkout` | Pay through the hosted checkout |

pub mod cli;
pub mod terminal;

pub use cli::{run, Cli, Command};
pub use terminal::{ProbeScriptLoader, TerminalHost, TerminalWidget};
