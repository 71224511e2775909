//! Configuration resolution
//!
//! Configuration is loaded and merged from these sources (later sources
//! override earlier ones):
//!
//! 1. **Global defaults** - `<config_dir>/regbase/config.toml`
//! 2. **Workspace config** - `.regbase/config.toml`
//! 3. **Local overrides** - `.regbase/config.local.toml`
//!
//! ```toml
//! [core]
//! baselines_dir = "golden"          # {id}.json baselines
//! backups_dir = "golden/backup"     # {id}/{id}_rev{N}_{date}.json
//! ledger_dir = "golden"             # {id}_edit.temp and {id}.lock
//! audit_log = "logs/regbase.log"
//!
//! [classifier]
//! protected_names = ["VendorPassword"]
//! ```

mod manifest;
mod resolver;

pub use manifest::{ClassifierSection, CoreSection, Manifest};
pub use resolver::{CONFIG_DIR, ConfigResolver, ResolvedConfig};
