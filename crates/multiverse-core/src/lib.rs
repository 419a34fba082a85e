//! Deterministic universe generation and synchronization for the Chronos
//! multiverse.
//!
//! Wall-clock time is divided into fixed-length epochs. Each epoch index is
//! a seed, and each seed expands into exactly one universe through a
//! seeded generator. Every observer running the same build therefore sees
//! the same universe during the same epoch, with no coordination.
//!
//! # Modules
//!
//! - [`archive`] -- The saved-universe set, unique by id, over an
//!   [`ArchiveStore`] backend.
//! - [`clock`] -- Epoch clock: seed derivation, countdown, and time sources.
//! - [`config`] -- Configuration loading from `multiverse-config.yaml` into
//!   strongly-typed structs.
//! - [`enricher`] -- [`Enricher`] trait and [`NullEnricher`].
//! - [`generator`] -- Seed to universe expansion with a pinned draw order.
//! - [`merge`] -- Staleness-guarded overlay merge.
//! - [`poll`] -- Background task that drives `refresh` on an interval.
//! - [`sequence`] -- The Lehmer pseudo-random sequence.
//! - [`share`] -- Share text for the current universe.
//! - [`sync`] -- [`SynchronizationController`], the owner of the current
//!   universe.
//! - [`tables`] -- Content tables the generator draws from.
//!
//! [`ArchiveStore`]: archive::ArchiveStore
//! [`Enricher`]: enricher::Enricher
//! [`NullEnricher`]: enricher::NullEnricher
//! [`SynchronizationController`]: sync::SynchronizationController

pub mod archive;
pub mod clock;
pub mod config;
pub mod enricher;
pub mod generator;
pub mod merge;
pub mod poll;
pub mod sequence;
pub mod share;
pub mod sync;
pub mod tables;
