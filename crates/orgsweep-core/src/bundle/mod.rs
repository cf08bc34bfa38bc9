//! Static analysis of deployable configuration bundles.
//!
//! Key/value-map and data-collector usages are not tracked in the explicit
//! resource graph; they only exist inside the XML configuration fragments of
//! deployed bundles. This module downloads a revision's bundle, walks its
//! policy fragments, and extracts the referenced resource names. Correctness
//! of KVM/data-collector deletion depends on running this *after* proxy and
//! shared-flow pruning, over every surviving revision.

pub mod analyzer;
pub mod parsers;

pub use analyzer::{scan_bundle, scan_surviving_revisions};
pub use parsers::UsagePolicy;
