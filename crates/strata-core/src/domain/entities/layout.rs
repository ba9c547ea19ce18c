use std::path::{Path, PathBuf};

use crate::domain::{error::DomainError, value_objects::is_identifier};

/// Directory convention of a layered service solution.
///
/// ```text
/// <root>/src/<M>.Domain/<M>.Domain.csproj
/// <root>/src/<M>.Application/Services/<Entity>/<Entity>Service.cs
/// <root>/src/<M>.Application/Services/.generation-registry.json
/// <root>/src/<M>.API/Controllers/<Entity>Controller.cs
/// <root>/src/<M>.API/Program.cs
/// <root>/src/<M>.Infrastructure/<M>.Infrastructure.csproj
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLayout {
    root: PathBuf,
    name: String,
}

pub const REGISTRY_FILE_NAME: &str = ".generation-registry.json";

impl ModuleLayout {
    /// Build a layout; `name` defaults to the last component of `root`.
    pub fn new(root: impl Into<PathBuf>, name: Option<&str>) -> Result<Self, DomainError> {
        let root = root.into();
        let name = match name {
            Some(name) => name.to_string(),
            None => root
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .ok_or(DomainError::MissingRequiredField {
                    field: "module name",
                })?,
        };

        validate_module_name(&name)?;
        Ok(Self { root, name })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn project_dir(&self, layer: &str) -> PathBuf {
        self.root.join("src").join(format!("{}.{layer}", self.name))
    }

    fn project_file(&self, layer: &str) -> PathBuf {
        self.project_dir(layer)
            .join(format!("{}.{layer}.csproj", self.name))
    }

    pub fn domain_dir(&self) -> PathBuf {
        self.project_dir("Domain")
    }

    /// The domain module descriptor; its absence means the module is missing.
    pub fn domain_project(&self) -> PathBuf {
        self.project_file("Domain")
    }

    pub fn application_project(&self) -> PathBuf {
        self.project_file("Application")
    }

    pub fn infrastructure_project(&self) -> PathBuf {
        self.project_file("Infrastructure")
    }

    pub fn api_dir(&self) -> PathBuf {
        self.project_dir("API")
    }

    pub fn program_file(&self) -> PathBuf {
        self.api_dir().join("Program.cs")
    }

    /// Root of generated service artifacts.
    pub fn service_root(&self) -> PathBuf {
        self.project_dir("Application").join("Services")
    }

    pub fn controller_root(&self) -> PathBuf {
        self.api_dir().join("Controllers")
    }

    pub fn registry_file(&self) -> PathBuf {
        self.service_root().join(REGISTRY_FILE_NAME)
    }

    pub fn service_file(&self, entity: &str) -> PathBuf {
        self.service_root()
            .join(entity)
            .join(format!("{entity}Service.cs"))
    }

    pub fn controller_file(&self, entity: &str) -> PathBuf {
        self.controller_root().join(format!("{entity}Controller.cs"))
    }

    /// Namespace of generated services for an entity.
    pub fn service_namespace(&self, entity: &str) -> String {
        format!("{}.Application.Services.{entity}", self.name)
    }

    pub fn controller_namespace(&self) -> String {
        format!("{}.API.Controllers", self.name)
    }

    /// Namespace of the generic data-access accessor interface.
    pub fn repository_namespace(&self) -> String {
        format!("{}.Application.Common.Interfaces", self.name)
    }
}

fn validate_module_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::InvalidModuleName {
            name: name.into(),
            reason: "name cannot be empty".into(),
        });
    }
    if let Some(segment) = name.split('.').find(|s| !is_identifier(s)) {
        return Err(DomainError::InvalidModuleName {
            name: name.into(),
            reason: format!("'{segment}' is not a valid identifier"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_defaults_to_root_directory() {
        let layout = ModuleLayout::new("/work/Shop", None).unwrap();
        assert_eq!(layout.name(), "Shop");
        assert_eq!(
            layout.domain_project(),
            PathBuf::from("/work/Shop/src/Shop.Domain/Shop.Domain.csproj")
        );
    }

    #[test]
    fn explicit_name_overrides_directory() {
        let layout = ModuleLayout::new("/work/checkout", Some("Acme.Shop")).unwrap();
        assert_eq!(
            layout.service_file("Order"),
            PathBuf::from(
                "/work/checkout/src/Acme.Shop.Application/Services/Order/OrderService.cs"
            )
        );
        assert_eq!(
            layout.controller_file("Order"),
            PathBuf::from("/work/checkout/src/Acme.Shop.API/Controllers/OrderController.cs")
        );
    }

    #[test]
    fn registry_lives_under_service_root() {
        let layout = ModuleLayout::new("/w/Shop", None).unwrap();
        assert!(layout.registry_file().starts_with(layout.service_root()));
    }

    #[test]
    fn rejects_non_identifier_names() {
        assert!(ModuleLayout::new("/work/my-shop", None).is_err());
        assert!(ModuleLayout::new("/work/x", Some("Acme..Shop")).is_err());
    }
}
