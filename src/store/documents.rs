//! Templates and configurations: named documents an invoice can start from.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Record, Records, StoreError};
use crate::error::Result;
use crate::model::Document;

/// Create/update payload shared by templates and configurations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub document: Document,
}

impl NamedDocument {
    pub fn new(name: impl Into<String>, document: Document) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            document,
        }
    }

    fn require_name(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            Err(StoreError::MissingField("name"))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub document: Document,
}

impl Record for Template {
    const KIND: &'static str = "Template";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub document: Document,
    #[serde(default)]
    pub is_primary: bool,
}

impl Record for Configuration {
    const KIND: &'static str = "Configuration";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateStore {
    records: Records<Template>,
}

impl TemplateStore {
    pub fn create(&mut self, input: NamedDocument) -> Result<&Template> {
        input.require_name()?;
        let id = self.records.allocate_id();
        info!(%id, name = %input.name, "template created");
        Ok(self.records.insert(Template {
            id,
            name: input.name,
            description: input.description,
            document: input.document,
        }))
    }

    pub fn get(&self, id: &str) -> Result<&Template> {
        Ok(self.records.get(id)?)
    }

    pub fn update(&mut self, id: &str, input: NamedDocument) -> Result<&Template> {
        input.require_name()?;
        let template = self.records.get_mut(id)?;
        template.name = input.name;
        template.description = input.description;
        template.document = input.document;
        info!(id, "template updated");
        Ok(template)
    }

    pub fn delete(&mut self, id: &str) -> Result<Template> {
        let template = self.records.remove(id)?;
        info!(id, "template deleted");
        Ok(template)
    }

    pub fn list(&self) -> impl Iterator<Item = &Template> {
        self.records.iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigurationStore {
    records: Records<Configuration>,
}

impl ConfigurationStore {
    pub fn create(&mut self, input: NamedDocument) -> Result<&Configuration> {
        input.require_name()?;
        let id = self.records.allocate_id();
        info!(%id, name = %input.name, "configuration created");
        Ok(self.records.insert(Configuration {
            id,
            name: input.name,
            description: input.description,
            document: input.document,
            is_primary: false,
        }))
    }

    pub fn get(&self, id: &str) -> Result<&Configuration> {
        Ok(self.records.get(id)?)
    }

    /// Replace name, description and document. `isPrimary` is untouched.
    pub fn update(&mut self, id: &str, input: NamedDocument) -> Result<&Configuration> {
        input.require_name()?;
        let configuration = self.records.get_mut(id)?;
        configuration.name = input.name;
        configuration.description = input.description;
        configuration.document = input.document;
        info!(id, "configuration updated");
        Ok(configuration)
    }

    pub fn delete(&mut self, id: &str) -> Result<Configuration> {
        let configuration = self.records.remove(id)?;
        info!(id, "configuration deleted");
        Ok(configuration)
    }

    pub fn list(&self) -> impl Iterator<Item = &Configuration> {
        self.records.iter()
    }

    /// The newest configuration flagged primary, if any.
    pub fn primary(&self) -> Option<&Configuration> {
        self.records.iter().find(|c| c.is_primary)
    }
}
