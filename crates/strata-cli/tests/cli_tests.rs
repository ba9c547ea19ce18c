//! Integration tests for the `strata` binary.
//!
//! Every test runs inside its own temp directory with `XDG_CONFIG_HOME`
//! pointed there, so no user configuration leaks in.  Tests that write the
//! default config file only run where that variable decides its location.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ATTRIBUTE: &str = r#"namespace Strata.Annotations;

public sealed class GenerateCrudAttribute : Attribute { }
"#;

const CUSTOMER: &str = r#"using Strata.Annotations;

namespace Shop.Domain.Entities;

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
public class Invoice
{
    public decimal Amount { get; set; }
    public bool IsDeleted { get; set; }
}
"#;

const APPLICATION_CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
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
app.Run();
"#;

// ── fixture ───────────────────────────────────────────────────────────────────

/// A `Shop` module on disk under a fresh temp directory.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let ws = Self {
            dir: TempDir::new().unwrap(),
        };
        ws.write("Shop/src/Shop.Domain/Shop.Domain.csproj", "<Project Sdk=\"Microsoft.NET.Sdk\" />");
        ws.write("Shop/src/Shop.Domain/Annotations/GenerateCrudAttribute.cs", ATTRIBUTE);
        ws.write("Shop/src/Shop.Domain/Entities/Customer.cs", CUSTOMER);
        ws.write("Shop/src/Shop.Domain/Entities/Order.cs", ORDER);
        ws.write("Shop/src/Shop.Application/Shop.Application.csproj", APPLICATION_CSPROJ);
        ws.write("Shop/src/Shop.Infrastructure/Shop.Infrastructure.csproj", INFRASTRUCTURE_CSPROJ);
        ws.write("Shop/src/Shop.API/Program.cs", PROGRAM);
        ws
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }

    fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    /// `strata` running in the workspace with a clean environment.
    fn strata(&self) -> Command {
        strata_in(self.dir.path())
    }
}

fn strata_in(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("strata").unwrap();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("STRATA__") {
            cmd.env_remove(key);
        }
    }
    cmd
}

const CUSTOMER_SERVICE: &str = "Shop/src/Shop.Application/Services/Customer/CustomerService.cs";
const ORDER_CONTROLLER: &str = "Shop/src/Shop.API/Controllers/OrderController.cs";
const REGISTRY: &str = "Shop/src/Shop.Application/Services/.generation-registry.json";
const INFRASTRUCTURE: &str = "Shop/src/Shop.Infrastructure/Shop.Infrastructure.csproj";
const PROGRAM_CS: &str = "Shop/src/Shop.API/Program.cs";

// ── surface ───────────────────────────────────────────────────────────────────

#[test]
fn help_lists_commands() {
    let tmp = TempDir::new().unwrap();
    strata_in(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("wire"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag() {
    let tmp = TempDir::new().unwrap();
    strata_in(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_arguments_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    strata_in(tmp.path()).assert().code(2);
}

#[test]
fn completions_name_the_binary() {
    let tmp = TempDir::new().unwrap();
    strata_in(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("strata"));
}

// ── generate ──────────────────────────────────────────────────────────────────

#[test]
fn generate_writes_artifacts_registry_and_wiring() {
    let ws = Workspace::new();

    ws.strata()
        .args(["generate", "Shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 2 entities"))
        .stdout(predicate::str::contains("Wired provider postgresql"));

    assert!(ws.exists(CUSTOMER_SERVICE));
    assert!(ws.exists(ORDER_CONTROLLER));
    assert!(ws.read(ORDER_CONTROLLER).contains("GetById(Guid id,"));

    let registry = ws.read(REGISTRY);
    assert!(registry.contains("\"Customer\""));
    assert!(registry.contains("\"Order\""));

    assert!(ws.read(INFRASTRUCTURE).contains("Npgsql.EntityFrameworkCore.PostgreSQL"));
    assert!(ws.read(PROGRAM_CS).contains("UseNpgsql"));
    assert!(ws.read("Shop/src/Shop.Application/Shop.Application.csproj").contains("Services\\**\\*.cs"));
}

#[test]
fn rerun_changes_nothing() {
    let ws = Workspace::new();
    ws.strata().args(["generate", "Shop"]).assert().success();

    let registry = ws.read(REGISTRY);
    let program = ws.read(PROGRAM_CS);
    ws.write(CUSTOMER_SERVICE, "// hand edited\n");

    ws.strata()
        .args(["generate", "Shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing new: 2 marked entities already generated"));

    assert_eq!(ws.read(REGISTRY), registry);
    assert_eq!(ws.read(PROGRAM_CS), program);
    assert_eq!(ws.read(CUSTOMER_SERVICE), "// hand edited\n");
}

#[test]
fn new_entity_gets_fallback_key_and_soft_delete() {
    let ws = Workspace::new();
    ws.strata().args(["generate", "Shop", "--no-wire"]).assert().success();

    ws.write("Shop/src/Shop.Domain/Entities/Invoice.cs", INVOICE);
    ws.strata()
        .args(["generate", "Shop", "--no-wire", "--soft-delete"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 1 entity"));

    let service = ws.read("Shop/src/Shop.Application/Services/Invoice/InvoiceService.cs");
    assert!(service.contains("IRepository<Invoice, int>"));
    assert!(service.contains("existing.IsDeleted = true;"));
    let controller = ws.read("Shop/src/Shop.API/Controllers/InvoiceController.cs");
    assert!(controller.contains("CreatedAtAction(nameof(GetAll), created)"));
    assert!(!controller.contains("created.Id"));
    assert!(ws.read(REGISTRY).contains("\"includeSoftDelete\": true"));
}

#[test]
fn no_wire_leaves_project_files_alone() {
    let ws = Workspace::new();
    ws.strata().args(["generate", "Shop", "--no-wire"]).assert().success();
    assert_eq!(ws.read(PROGRAM_CS), PROGRAM);
    assert_eq!(ws.read(INFRASTRUCTURE), INFRASTRUCTURE_CSPROJ);
}

#[test]
fn missing_marker_warns_and_still_wires() {
    let ws = Workspace::new();
    fs::remove_file(ws.path("Shop/src/Shop.Domain/Annotations/GenerateCrudAttribute.cs")).unwrap();

    ws.strata()
        .args(["generate", "Shop", "--marker", "Acme.Annotations.ScaffoldAttribute"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not found; skipping generation"))
        .stdout(predicate::str::contains("Wired provider"));

    assert!(!ws.exists(CUSTOMER_SERVICE));
    assert!(!ws.exists(REGISTRY));
    assert!(ws.read(PROGRAM_CS).contains("UseNpgsql"));
}

#[test]
fn json_output_is_one_document() {
    let ws = Workspace::new();
    let assert = ws
        .strata()
        .args(["--output-format", "json", "generate", "Shop", "--no-wire"])
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(value["command"], "generate");
    assert_eq!(value["module"], "Shop");
    assert_eq!(value["generation"]["discovered"], 2);
    assert_eq!(value["generation"]["registry_updated"], true);
    assert!(value["wiring"].is_null());

    let events = value["events"].as_array().unwrap();
    let generated = events
        .iter()
        .filter(|e| e["event"] == "entity_generated")
        .count();
    assert_eq!(generated, 2);
}

#[test]
fn missing_module_exits_three() {
    let ws = Workspace::new();
    fs::create_dir(ws.path("Empty")).unwrap();

    ws.strata()
        .args(["generate", "Empty"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Module not found"));

    ws.strata().args(["generate", "Nowhere"]).assert().code(3);
}

#[test]
fn corrupt_registry_exits_two_without_writing() {
    let ws = Workspace::new();
    ws.write(REGISTRY, "{ not json");

    ws.strata()
        .args(["generate", "Shop"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("corrupt"));

    assert!(!ws.exists(CUSTOMER_SERVICE));
    assert_eq!(ws.read(PROGRAM_CS), PROGRAM);
}

#[test]
fn module_flag_overrides_directory_name() {
    let ws = Workspace::new();
    fs::rename(ws.path("Shop"), ws.path("checkout")).unwrap();

    ws.strata()
        .args(["generate", "checkout", "--module", "Shop", "--no-wire"])
        .assert()
        .success();
    assert!(ws.exists("checkout/src/Shop.API/Controllers/CustomerController.cs"));
}

// ── wire ──────────────────────────────────────────────────────────────────────

#[test]
fn wire_switches_provider() {
    let ws = Workspace::new();
    ws.strata().args(["wire", "Shop"]).assert().success();
    ws.strata()
        .args(["wire", "Shop", "--provider", "mssql"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wired provider sqlserver"));

    let infra = ws.read(INFRASTRUCTURE);
    assert!(!infra.contains("Npgsql"));
    assert!(infra.contains("Microsoft.EntityFrameworkCore.SqlServer"));
    assert_eq!(ws.read(PROGRAM_CS).matches("AddDbContext").count(), 1);
}

#[test]
fn rewiring_one_line_item_group_is_stable() {
    let ws = Workspace::new();
    ws.write(INFRASTRUCTURE, "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <ItemGroup></ItemGroup>\n</Project>\n");

    ws.strata().args(["wire", "Shop"]).assert().success();
    let once = ws.read(INFRASTRUCTURE);
    ws.strata().args(["wire", "Shop"]).assert().success();

    assert_eq!(ws.read(INFRASTRUCTURE), once);
    assert_eq!(once.matches("<ItemGroup>").count(), 1);
    assert!(once.contains("Npgsql.EntityFrameworkCore.PostgreSQL"));
}

#[test]
fn wire_with_missing_program_warns() {
    let ws = Workspace::new();
    fs::remove_file(ws.path(PROGRAM_CS)).unwrap();

    ws.strata()
        .args(["wire", "Shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file not found"))
        .stdout(predicate::str::contains("incomplete"));

    assert!(ws.read(INFRASTRUCTURE).contains("Npgsql"));
}

#[test]
fn unknown_provider_is_usage_error() {
    let ws = Workspace::new();
    ws.strata()
        .args(["wire", "Shop", "--provider", "mysql"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("postgresql"));
}

// ── configuration ─────────────────────────────────────────────────────────────

#[test]
fn environment_selects_provider() {
    let ws = Workspace::new();
    ws.strata()
        .env("STRATA__GENERATOR__PROVIDER", "oracle")
        .args(["wire", "Shop"])
        .assert()
        .success();
    assert!(ws.read(INFRASTRUCTURE).contains("Oracle.EntityFrameworkCore"));
}

#[test]
fn config_file_sets_fallback_key() {
    let ws = Workspace::new();
    ws.write("strata.toml", "[generator]\nfallback_key_type = \"long\"\n");
    ws.write("Shop/src/Shop.Domain/Entities/Invoice.cs", INVOICE);

    ws.strata()
        .args(["--config", "strata.toml", "generate", "Shop", "--no-wire"])
        .assert()
        .success();
    assert!(
        ws.read("Shop/src/Shop.API/Controllers/InvoiceController.cs")
            .contains("GetById(long id,")
    );
}

#[test]
fn invalid_marker_setting_exits_four() {
    let ws = Workspace::new();
    ws.strata()
        .env("STRATA__GENERATOR__MARKER", "Acme..Broken")
        .args(["generate", "Shop"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("generator.marker"));
}

#[test]
fn missing_explicit_config_file_exits_four() {
    let ws = Workspace::new();
    ws.strata()
        .args(["--config", "absent.toml", "config", "list"])
        .assert()
        .code(4);
}

#[test]
fn config_get_prints_value() {
    let ws = Workspace::new();
    ws.strata()
        .args(["config", "get", "generator.provider"])
        .assert()
        .success()
        .stdout("postgresql\n");

    ws.strata()
        .args(["config", "get", "nope.key"])
        .assert()
        .code(4);
}

#[cfg(target_os = "linux")]
#[test]
fn init_refuses_to_overwrite_without_force() {
    let ws = Workspace::new();
    ws.strata()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration created"));

    ws.strata().arg("init").assert().code(2);
    ws.strata().args(["init", "--force"]).assert().success();
}

#[cfg(target_os = "linux")]
#[test]
fn config_path_follows_xdg() {
    let ws = Workspace::new();
    let expected = ws.path(".config").join("strata").join("config.toml");

    ws.strata()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));

    ws.strata().arg("init").assert().success();
    assert!(fs::read_to_string(expected).unwrap().contains("[generator]"));
}

// ── new ───────────────────────────────────────────────────────────────────────

#[test]
fn new_rejects_invalid_name() {
    let tmp = TempDir::new().unwrap();
    strata_in(tmp.path())
        .args(["new", "my-shop"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("my-shop"));
}

#[test]
fn new_without_templating_tool_exits_one() {
    let tmp = TempDir::new().unwrap();
    strata_in(tmp.path())
        .env("STRATA__SCAFFOLD__PROGRAM", "strata-test-no-such-tool")
        .args(["new", "Shop"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found on PATH"));
}

#[cfg(unix)]
#[test]
fn new_wires_after_tool_succeeds() {
    let tmp = TempDir::new().unwrap();
    // `true` exits 0 without creating anything; wiring then reports the gaps
    strata_in(tmp.path())
        .env("STRATA__SCAFFOLD__PROGRAM", "true")
        .args(["new", "Shop", "--provider", "oracle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Solution 'Shop' created"))
        .stdout(predicate::str::contains("incomplete"));
}
