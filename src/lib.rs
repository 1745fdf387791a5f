//! # Gallery Manifest
//!
//! Build-time manifest generation for a bilingual (Arabic/English) project
//! gallery website, plus the fallback chain a visitor's page uses to find
//! projects when the manifest is missing.
//!
//! The filesystem is the data source: every folder under `Gallery/` is a
//! project, named by the convention `English Name-الاسم العربي`, and every
//! flat file under `images/` is a hero banner candidate.
//!
//! # Architecture: Generate Once, Resolve Anywhere
//!
//! ```text
//! generate   Gallery/ + images/  →  manifest.json     (filesystem → structured data)
//! resolve    manifest.json       →  projects, heroes  (falls back to listings, then guesses)
//! ```
//!
//! Generation is a one-shot batch: scan, assemble, replace the manifest file
//! atomically. Resolution is what the site does at page load. It trusts the
//! manifest when there is one, and otherwise scrapes the web server's
//! directory listings or probes conventional file names.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`classify`] | Filename predicates: image extensions, thumbnail, hero exclusions |
//! | [`naming`] | Folder name → bilingual display names and category |
//! | [`source`] | `SourceTree` filesystem abstraction and the `walkdir` implementation |
//! | [`scan`] | Recursive image walk, project and hero image collection |
//! | [`manifest`] | Manifest assembly, atomic persistence, loading |
//! | [`types`] | Shared types serialized into `manifest.json` |
//! | [`fetch`] | `Fetcher` HTTP abstraction and the `reqwest` implementation |
//! | [`listing`] | Directory-listing `href` scraping |
//! | [`client`] | Manifest → listing → guess fallback chain |
//! | [`config`] | `site.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI report formatting |
//!
//! # Design Decisions
//!
//! ## Ids From Listing Position
//!
//! A project's id is its folder's position in the gallery listing plus one,
//! counting every entry. Ids are stable across regenerations of an unchanged
//! tree, even though folders are scanned in parallel.
//!
//! ## I/O Behind Traits
//!
//! Scanners take a [`source::SourceTree`] and the client takes a
//! [`fetch::Fetcher`]. Production code passes the local filesystem and a
//! `reqwest` client; tests pass an in-memory tree and a recording mock, so
//! every fallback tier is exercised without a network.
//!
//! ## Nothing Is Fatal
//!
//! Missing directories are created, unreadable entries are skipped, and a
//! site with nothing to show resolves to an empty state. The only error a
//! generation can surface is failing to write the manifest itself.

pub mod classify;
pub mod client;
pub mod config;
pub mod fetch;
pub mod listing;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod scan;
pub mod source;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
