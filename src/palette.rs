//! Command dispatcher - the single entry point of the palette / 命令分发器
//!
//! - empty command → `EmptyCommand` (the only error callers ever see)
//! - `/ap`, `/dp` → plugin action links
//! - anything else → parse and search
//!
//! Source and permission failures are logged here and folded into an empty
//! result set.

use crate::error::{PaletteError, PaletteResult};
use crate::models::Caller;
use crate::plugins::{PluginAction, PluginLinks};
use crate::search::{parse, ResultSet, SearchEngine};

/// Command palette / 命令面板
pub struct CommandPalette {
    engine: SearchEngine,
    plugins: PluginLinks,
}

impl CommandPalette {
    pub fn new(engine: SearchEngine, plugins: PluginLinks) -> Self {
        Self { engine, plugins }
    }

    /// Dispatch a raw command / 分发命令
    pub async fn dispatch(&self, raw: Option<&str>, caller: &Caller) -> PaletteResult<ResultSet> {
        let command = raw.map(str::trim).unwrap_or_default();
        if command.is_empty() {
            return Err(PaletteError::EmptyCommand);
        }

        if command.contains('/') {
            return Ok(self.run_action(command, caller).await);
        }

        let query = parse(command);
        match self.engine.search(&query).await {
            Ok(set) => Ok(set),
            Err(e) => {
                tracing::warn!("Search for {:?} returned nothing: {}", command, e);
                Ok(ResultSet::empty())
            }
        }
    }

    async fn run_action(&self, command: &str, caller: &Caller) -> ResultSet {
        let Some(action) = PluginAction::from_command(command) else {
            tracing::debug!("Unknown action command {:?}", command);
            return ResultSet::empty();
        };

        match self.plugins.list_plugin_links(action, caller).await {
            Ok(set) => set,
            Err(e @ PaletteError::UnauthorizedAction(_)) => {
                tracing::warn!("Action {:?} denied for user {:?}: {}", command, caller.user_id, e);
                ResultSet::empty()
            }
            Err(e) => {
                tracing::warn!("Action {:?} failed: {}", command, e);
                ResultSet::empty()
            }
        }
    }
}
