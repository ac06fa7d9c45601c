//! # Kindle Clippings
//!
//! Turns an e-reader "My Clippings.txt" export into one plain-text file per
//! book, appending only highlights that are not already stored.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌───────────┐   ┌──────────┐
//! │  parse   │──▶│ aggregate │──▶│ reconcile │──▶│   plan   │
//! │ + date   │   │  + title  │   │ + storage │   │          │
//! └──────────┘   └───────────┘   └───────────┘   └────┬─────┘
//!                                                     │
//!                                  ┌──────────────────┤
//!                                  ▼                  ▼
//!                             ┌──────────┐      ┌──────────┐
//!                             │  export  │      │  report  │
//!                             │ files+log│      │  table   │
//!                             └──────────┘      └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! kclip init                    # write ./config/kclip.toml
//! kclip show --filter-date      # preview what would be exported
//! kclip append --filter-date    # append new highlights, advance watermark
//! kclip create                  # rewrite every book into the output folder
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`parse`] | Split the export into clipping records |
//! | [`date`] | Locale-tolerant timestamp parsing |
//! | [`title`] | Title normalization (grouping key and file stem) |
//! | [`aggregate`] | Group records into books, apply the watermark filter |
//! | [`storage`] | Index of previously exported files |
//! | [`reconcile`] | Existing vs new highlights per book |
//! | [`plan`] | Write action per book, watermark write-back decision |
//! | [`export`] | File creation, appends and the action log |
//! | [`report`] | Console table |
//! | [`config`] | TOML configuration and watermark persistence |
//! | [`run`] | One end-to-end run |

pub mod aggregate;
pub mod config;
pub mod date;
pub mod export;
pub mod models;
pub mod parse;
pub mod plan;
pub mod reconcile;
pub mod report;
pub mod run;
pub mod storage;
pub mod title;
