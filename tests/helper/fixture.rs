//! Template fixtures on disk

use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const MAIN_BICEP: &str = r#"targetScope = 'subscription'

resource rg 'Microsoft.Resources/resourceGroups@2021-01-01' = {
  name: 'rg-web'
  location: 'westeurope'
}
"#;

pub const WEB_BICEP: &str = r#"param location string = resourceGroup().location

resource plan 'Microsoft.Web/serverfarms@2020-06-01' = {
  name: 'plan'
  location: location
}

resource site 'Microsoft.Web/sites@2019-08-01' = {
  name: 'site'
  location: location
  properties: {
    serverFarmId: plan.id
  }
}

output siteId string = site.id
"#;

pub const BROKEN_BICEP: &str = r#"resource vault 'Microsoft.KeyVault/vaults@2019-09-01' = {
  name: 'kv'
}
"#;

/// Writes `files` (relative path, content) under a fresh temporary directory
pub fn create_tree(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (relative, content) in files {
        write_file(temp_dir.path(), relative, content);
    }
    temp_dir
}

pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}
