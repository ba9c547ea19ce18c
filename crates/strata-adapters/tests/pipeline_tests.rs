//! End-to-end runs of the generation and wiring services over real C#
//! sources, using the adapters from this crate.

use std::path::Path;

use strata_adapters::{
    CSharpArtifactRenderer, CSharpSourceLoader, CollectingReporter, JsonRegistryStore,
    LocalFilesystem, MemoryFilesystem,
};
use strata_core::{
    application::{ApplicationError, ports::Filesystem},
    prelude::*,
};
use tempfile::TempDir;

const ATTRIBUTE: &str = r#"namespace Strata.Annotations;

[AttributeUsage(AttributeTargets.Class, Inherited = false)]
public sealed class GenerateCrudAttribute : Attribute { }
"#;

const CUSTOMER: &str = r#"using Strata.Annotations;

namespace Shop.Domain.Entities;

/// <summary>A customer. Not to be confused with "class Customer {".</summary>
[GenerateCrud]
public class Customer
{
    public int Id { get; set; }
    public string Name { get; set; } = string.Empty;
}
"#;

const ORDER: &str = r#"using System;
using Strata.Annotations;

namespace Shop.Domain.Entities
{
    [GenerateCrud]
    public record Order(Guid Id, decimal Total);
}
"#;

const INVOICE: &str = r#"using Strata.Annotations;

namespace Shop.Domain.Entities;

[GenerateCrud]
public class Invoice : AuditableEntity
{
    public decimal Amount { get; set; }
}
"#;

const UNMARKED: &str = r#"namespace Shop.Domain.Entities;

public class AuditableEntity
{
    public DateTime CreatedOn { get; set; }
}
"#;

const APPLICATION_CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
  <ItemGroup>
    <ProjectReference Include="..\Shop.Domain\Shop.Domain.csproj" />
  </ItemGroup>
</Project>
"#;

const INFRASTRUCTURE_CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="Microsoft.EntityFrameworkCore" Version="8.0.0" />
  </ItemGroup>
</Project>
"#;

const PROGRAM: &str = r#"var builder = WebApplication.CreateBuilder(args);

builder.Services.AddControllers();

// Logging setup
builder.Logging.AddConsole();

var app = builder.Build();
app.MapControllers();
app.Run();
"#;

// ============================================================================
// Fixture
// ============================================================================

struct Module {
    fs: MemoryFilesystem,
    layout: ModuleLayout,
    reporter: CollectingReporter,
}

impl Module {
    fn new() -> Self {
        let layout = ModuleLayout::new("/work/Shop", None).unwrap();
        let domain = layout.domain_dir();
        let fs = MemoryFilesystem::new()
            .with_file(layout.domain_project(), "<Project Sdk=\"Microsoft.NET.Sdk\" />")
            .with_file(domain.join("Annotations/GenerateCrudAttribute.cs"), ATTRIBUTE)
            .with_file(domain.join("Entities/AuditableEntity.cs"), UNMARKED)
            .with_file(domain.join("Entities/Customer.cs"), CUSTOMER)
            .with_file(domain.join("Entities/Order.cs"), ORDER)
            .with_file(layout.application_project(), APPLICATION_CSPROJ)
            .with_file(layout.infrastructure_project(), INFRASTRUCTURE_CSPROJ)
            .with_file(layout.program_file(), PROGRAM);

        Self {
            fs,
            layout,
            reporter: CollectingReporter::new(),
        }
    }

    fn generation(&self) -> GenerationService {
        GenerationService::new(
            Box::new(CSharpSourceLoader::new(Box::new(self.fs.clone()))),
            Box::new(JsonRegistryStore::new(Box::new(self.fs.clone()))),
            Box::new(CSharpArtifactRenderer::new()),
            Box::new(self.fs.clone()),
            Box::new(self.reporter.clone()),
        )
    }

    fn wiring(&self) -> WiringService {
        WiringService::new(Box::new(self.fs.clone()), Box::new(self.reporter.clone()))
    }

    fn generate(&self) -> StrataResult<GenerationReport> {
        self.generation()
            .generate(&self.layout, &GenerationOptions::default())
    }

    fn registry(&self) -> Vec<String> {
        JsonRegistryStore::new(Box::new(self.fs.clone()))
            .load(&self.layout.registry_file())
            .unwrap()
            .entries()
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }

    fn read(&self, path: &Path) -> String {
        self.fs.get(path).unwrap()
    }
}

// ============================================================================
// Generation
// ============================================================================

#[test]
fn first_run_emits_service_and_controller_per_entity() {
    let m = Module::new();
    let before = m.fs.file_count();

    let report = m.generate().unwrap();

    assert_eq!(report.generated, vec!["Customer", "Order"]);
    assert!(!report.marker.is_fallback());
    // four artifacts plus the registry document
    assert_eq!(m.fs.file_count(), before + 5);
    assert_eq!(m.registry(), vec!["Customer", "Order"]);

    let order_service = m.read(&m.layout.service_file("Order"));
    assert!(order_service.contains("Task<Order?> GetByIdAsync(Guid id,"));
    let customer_controller = m.read(&m.layout.controller_file("Customer"));
    assert!(customer_controller.contains("GetById(int id,"));
}

#[test]
fn rerun_without_changes_writes_nothing() {
    let m = Module::new();
    m.generate().unwrap();
    let registry_text = m.read(&m.layout.registry_file());
    let files = m.fs.paths();
    m.reporter.take();

    let report = m.generate().unwrap();

    assert!(report.is_noop());
    assert_eq!(report.already_generated, vec!["Customer", "Order"]);
    assert_eq!(m.fs.paths(), files);
    assert_eq!(m.read(&m.layout.registry_file()), registry_text);
    assert!(m.reporter.events().contains(&GenerationEvent::NoNewEntities));
}

#[test]
fn new_entity_without_id_uses_fallback_key() {
    let m = Module::new();
    m.generate().unwrap();

    m.fs.insert(m.layout.domain_dir().join("Entities/Invoice.cs"), INVOICE);
    let report = m.generate().unwrap();

    assert_eq!(report.generated, vec!["Invoice"]);
    assert_eq!(m.registry(), vec!["Customer", "Order", "Invoice"]);
    let service = m.read(&m.layout.service_file("Invoice"));
    assert!(service.contains("IRepository<Invoice, int>"));
    assert!(service.contains("DeleteAsync(int id,"));
}

#[test]
fn emission_is_byte_identical_across_modules() {
    let first = Module::new();
    let second = Module::new();
    first.generate().unwrap();
    second.generate().unwrap();

    for entity in ["Customer", "Order"] {
        for path in [
            first.layout.service_file(entity),
            first.layout.controller_file(entity),
        ] {
            assert_eq!(first.read(&path), second.read(&path));
        }
    }
}

#[test]
fn missing_marker_skips_generation_but_not_wiring() {
    let m = Module::new();
    m.fs.insert(
        m.layout.domain_dir().join("Annotations/GenerateCrudAttribute.cs"),
        "namespace Strata.Annotations; public sealed class Unrelated { }",
    );

    let report = m.generate().unwrap();
    assert_eq!(report.discovered, 0);
    assert!(!m.fs.exists(&m.layout.registry_file()));
    assert_eq!(m.reporter.warnings().len(), 1);

    let wiring = m.wiring().wire(&m.layout, Provider::PostgreSql).unwrap();
    assert!(wiring.is_complete());
}

#[test]
fn missing_domain_project_is_fatal() {
    let layout = ModuleLayout::new("/work/Nowhere", None).unwrap();
    let m = Module::new();
    let err = m
        .generation()
        .generate(&layout, &GenerationOptions::default())
        .unwrap_err();

    assert!(matches!(
        err,
        StrataError::Application(ApplicationError::ModuleNotFound { .. })
    ));
}

#[test]
fn corrupt_registry_aborts_before_writes() {
    let m = Module::new();
    m.fs.insert(m.layout.registry_file(), "not json");
    let before = m.fs.paths();

    let err = m.generate().unwrap_err();

    assert!(matches!(
        err,
        StrataError::Application(ApplicationError::RegistryCorrupt { .. })
    ));
    assert_eq!(m.fs.paths(), before);
}

#[test]
fn write_failure_keeps_successful_subset_and_recovers() {
    let m = Module::new();
    m.fs.fail_writes_to(m.layout.controller_file("Order"));

    let err = m.generate().unwrap_err();
    assert!(matches!(
        err,
        StrataError::Application(ApplicationError::ArtifactWriteFailure { .. })
    ));
    assert_eq!(m.registry(), vec!["Customer"]);
    assert!(m.fs.exists(&m.layout.service_file("Order")));

    m.fs.clear_failures();
    let report = m.generate().unwrap();
    assert_eq!(report.generated, vec!["Order"]);
    assert_eq!(m.registry(), vec!["Customer", "Order"]);
    assert!(m.fs.exists(&m.layout.controller_file("Order")));
}

#[test]
fn soft_delete_option_is_recorded() {
    let m = Module::new();
    let options = GenerationOptions {
        include_soft_delete: true,
        ..GenerationOptions::default()
    };

    m.generation().generate(&m.layout, &options).unwrap();

    let registry = JsonRegistryStore::new(Box::new(m.fs.clone()))
        .load(&m.layout.registry_file())
        .unwrap();
    assert!(registry.entries().iter().all(|e| e.include_soft_delete));
    assert!(m
        .read(&m.layout.service_file("Customer"))
        .contains("existing.IsDeleted = true;"));
}

// ============================================================================
// Wiring
// ============================================================================

#[test]
fn provider_switch_replaces_blocks_exclusively() {
    let m = Module::new();
    let wiring = m.wiring();

    wiring.wire(&m.layout, Provider::PostgreSql).unwrap();
    let report = wiring.wire(&m.layout, Provider::SqlServer).unwrap();
    assert!(report.is_complete());

    let infra = m.read(&m.layout.infrastructure_project());
    let program = m.read(&m.layout.program_file());
    for text in [&infra, &program] {
        assert!(!text.contains("Npgsql"));
    }
    assert_eq!(infra.matches("<!-- BEGIN_EF_PROVIDER -->").count(), 1);
    assert_eq!(infra.matches("<!-- END_EF_PROVIDER -->").count(), 1);
    assert!(infra.contains("Microsoft.EntityFrameworkCore.SqlServer"));
    assert_eq!(program.matches("/*<EF_REGISTRATION>*/").count(), 1);
    assert_eq!(program.matches("/*</EF_REGISTRATION>*/").count(), 1);
    assert!(program.contains("UseSqlServer"));

    // registration sits right before the logging marker
    let registration = program.find("/*<EF_REGISTRATION>*/").unwrap();
    let logging = program.find("// Logging setup").unwrap();
    assert!(registration < logging);
}

#[test]
fn rewiring_same_provider_is_byte_stable() {
    let m = Module::new();
    let wiring = m.wiring();
    wiring.wire(&m.layout, Provider::Oracle).unwrap();
    let snapshot: Vec<_> = [
        m.layout.application_project(),
        m.layout.infrastructure_project(),
        m.layout.program_file(),
    ]
    .iter()
    .map(|p| m.read(p))
    .collect();

    wiring.wire(&m.layout, Provider::Oracle).unwrap();

    assert_eq!(m.read(&m.layout.application_project()), snapshot[0]);
    assert_eq!(m.read(&m.layout.infrastructure_project()), snapshot[1]);
    assert_eq!(m.read(&m.layout.program_file()), snapshot[2]);
    assert_eq!(snapshot[0].matches("Services\\**\\*.cs").count(), 1);
}

#[test]
fn missing_program_file_does_not_stop_other_steps() {
    let m = Module::new();
    let fs = MemoryFilesystem::new()
        .with_file(m.layout.application_project(), APPLICATION_CSPROJ)
        .with_file(m.layout.infrastructure_project(), INFRASTRUCTURE_CSPROJ);
    let reporter = CollectingReporter::new();

    let report = WiringService::new(Box::new(fs.clone()), Box::new(reporter.clone()))
        .wire(&m.layout, Provider::PostgreSql)
        .unwrap();

    assert!(!report.is_complete());
    assert!(fs.get(m.layout.infrastructure_project()).unwrap().contains("Npgsql"));
    assert!(reporter
        .events()
        .iter()
        .any(|e| matches!(e, GenerationEvent::TargetFileNotFound { .. })));
}

// ============================================================================
// On disk
// ============================================================================

#[test]
fn local_filesystem_never_overwrites_hand_edits() {
    let dir = TempDir::new().unwrap();
    let layout = ModuleLayout::new(dir.path().join("Shop"), None).unwrap();
    let fs = LocalFilesystem::new();

    let write = |path: &Path, content: &str| {
        fs.create_dir_all(path.parent().unwrap()).unwrap();
        fs.write_file(path, content).unwrap();
    };
    write(&layout.domain_project(), "<Project />");
    write(
        &layout.domain_dir().join("Annotations/GenerateCrudAttribute.cs"),
        ATTRIBUTE,
    );
    write(&layout.domain_dir().join("Entities/Customer.cs"), CUSTOMER);
    write(&layout.domain_dir().join("bin/Debug/Leftover.cs"), CUSTOMER.replace("Customer", "Leftover").as_str());
    write(&layout.service_file("Customer"), "// mine\n");

    let reporter = CollectingReporter::new();
    let service = GenerationService::new(
        Box::new(CSharpSourceLoader::new(Box::new(LocalFilesystem::new()))),
        Box::new(JsonRegistryStore::new(Box::new(LocalFilesystem::new()))),
        Box::new(CSharpArtifactRenderer::new()),
        Box::new(LocalFilesystem::new()),
        Box::new(reporter.clone()),
    );

    let report = service
        .generate(&layout, &GenerationOptions::default())
        .unwrap();

    assert_eq!(report.generated, vec!["Customer"]);
    assert_eq!(
        std::fs::read_to_string(layout.service_file("Customer")).unwrap(),
        "// mine\n"
    );
    assert!(layout.controller_file("Customer").exists());
    assert!(!layout.controller_file("Leftover").exists());
    assert!(reporter
        .events()
        .iter()
        .any(|e| matches!(e, GenerationEvent::ArtifactSkipped { .. })));

    let registry = std::fs::read_to_string(layout.registry_file()).unwrap();
    assert!(registry.contains("\"name\": \"Customer\""));
}
