use std::path::Path;

use tracing::info;

use crate::descriptor::DescriptorSet;
use crate::error::{EcogenError, Result};

/// Pretty JSON with a trailing newline, keys in assembly order.
pub fn render(set: &DescriptorSet) -> Result<String> {
    set.validate()?;
    let mut rendered = serde_json::to_string_pretty(set)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Write the ecosystem file in a single write, replacing any previous one.
pub async fn write_descriptor_set(set: &DescriptorSet, output: &Path) -> Result<()> {
    let rendered = render(set)?;
    tokio::fs::write(output, rendered)
        .await
        .map_err(|source| EcogenError::Write {
            path: output.to_path_buf(),
            source,
        })?;

    info!(path = %output.display(), processes = set.processes.len(), "Wrote ecosystem file");
    Ok(())
}
