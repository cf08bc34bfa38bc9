//! Per-resource-kind deletion passes.
//!
//! Each cleaner implements one capability, [`Cleaner::delete`], and the
//! runner holds them as a homogeneous ordered list. The order is fixed
//! because later cleaners depend on invariants established by earlier ones:
//! products can only be judged eligible after proxy references were pruned,
//! the KVM/data-collector usage scans must see the post-pruning world, and
//! environments can only empty out after proxies and shared flows are gone.

pub mod apiproduct;
pub mod datacollector;
pub mod dev_and_app;
pub mod envgroup;
pub mod environment;
pub mod errors;
pub mod instance;
pub mod kvm;
pub mod proxy;
pub mod report;
pub mod sharedflow;
pub mod types;

pub use apiproduct::ApiProductCleaner;
pub use datacollector::DataCollectorCleaner;
pub use dev_and_app::DevAndAppCleaner;
pub use envgroup::EnvGroupCleaner;
pub use environment::EnvironmentCleaner;
pub use errors::CleanError;
pub use instance::InstanceCleaner;
pub use kvm::KvmCleaner;
pub use proxy::ProxyCleaner;
pub use report::CustomReportCleaner;
pub use sharedflow::SharedflowCleaner;
pub use types::{CleanContext, CleanStats, Cleaner};
