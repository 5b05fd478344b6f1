// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use args::{MovieArgs, QueryArgs};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "cinesync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "An offline-first client for a shared movie catalog")]
#[command(
    long_about = "An offline-first client for a shared movie catalog.\n\n\
    Browse, search and edit the catalog with or without a connection. Changes made \
    offline are kept in a durable pending log and replayed when the server is reachable."
)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Act as if the network were down
    #[arg(long, global = true)]
    pub offline: bool,

    /// Verbose logging (same as CINESYNC_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show connectivity, cache and pending log state
    Status {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List movies under a query
    #[command(after_help = "\
Examples:
  cinesync list                         First page of the catalog
  cinesync list -s alien --pages 2      Search titles, two pages
  cinesync list -c Drama -c Crime       Movies in either category
  cinesync list --min-rating 4          Rated 4 or higher
  cinesync list --sort-title asc        Sorted by title")]
    List {
        #[command(flatten)]
        query: QueryArgs,

        /// Number of pages to load
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,

        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show one movie
    Show {
        /// Movie id (local ids are negative)
        #[arg(allow_negative_numbers = true)]
        id: i64,

        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Add a movie
    #[command(after_help = "\
Examples:
  cinesync add -t \"Heat\" -r 4.5 -c Crime -d \"A heist in LA.\"")]
    Add {
        #[command(flatten)]
        movie: MovieArgs,
    },

    /// Replace fields of a movie
    Update {
        #[arg(allow_negative_numbers = true)]
        id: i64,

        #[command(flatten)]
        movie: MovieArgs,
    },

    /// Delete a movie
    Delete {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// List mutations waiting to be sent
    Pending {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Send pending mutations and refresh the cache
    Sync,

    /// Follow the catalog live, reading commands from stdin
    #[command(after_help = "\
Commands read from stdin, one per line:
  more                      Load the next page
  search <text>             Set the search text (empty clears)
  category <name>           Toggle a category
  min <rating>|none         Set or clear the minimum rating
  sort rating|title asc|desc|none
  sync                      Send pending mutations now
  network up|down           Simulate a network change
  quit                      Stop watching")]
    Watch,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
