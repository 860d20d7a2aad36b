//! Wiring a validated configuration into the repository services

use pixrepo_path::{NamingRules, PathValidator};

use crate::config::RepositoryConfig;
use crate::transform::{ClientPathTransformer, ServerPathTransformer};
use crate::{NextDirAllocator, NumberedDirSlots, Result};

/// A validated repository: the combined naming policy plus the path
/// transformers bound to the configured base directory.
#[derive(Debug, Clone)]
pub struct Repository {
    config: RepositoryConfig,
    rules: NamingRules,
    server: ServerPathTransformer,
    client: ClientPathTransformer,
}

impl Repository {
    /// Validate the configuration and wire up the services.
    pub fn open(config: RepositoryConfig) -> Result<Self> {
        config.validate()?;
        let rules = config.naming_rules()?;
        let server = ServerPathTransformer::new(&config.base_dir, rules.clone())?;
        let client = ClientPathTransformer::new(rules.clone());
        tracing::debug!(base_dir = %server.base_dir().display(), "opened repository");
        Ok(Self {
            config,
            rules,
            server,
            client,
        })
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn rules(&self) -> &NamingRules {
        &self.rules
    }

    pub fn server_transformer(&self) -> &ServerPathTransformer {
        &self.server
    }

    pub fn client_transformer(&self) -> &ClientPathTransformer {
        &self.client
    }

    pub fn validator(&self) -> PathValidator {
        PathValidator::new(self.rules.clone())
    }

    /// Numbered directory slots directly under the repository root.
    pub fn dir_slots(&self, prefix: &str) -> Result<NumberedDirSlots> {
        NumberedDirSlots::new(self.server.base_dir(), prefix)
    }

    /// A directory allocator with the default contention deadline.
    pub fn allocator(&self) -> NextDirAllocator {
        NextDirAllocator::default()
    }
}
