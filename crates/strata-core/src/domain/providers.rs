//! Data-access provider catalogue.
//!
//! Each provider is described exactly once by its [`ProviderDef`]. The
//! wiring service asks this table for the package-reference line that goes
//! into the infrastructure project and the registration statement that goes
//! into the API entry point.
//!
//! # Adding a New Provider
//!
//! 1. Add a variant to `Provider` in `value_objects.rs`
//! 2. Add one [`ProviderDef`] entry to [`PROVIDER_REGISTRY`]

use crate::domain::value_objects::Provider;

/// Package version written into the provider reference.
pub const EF_CORE_VERSION: &str = "8.0.0";

/// Name of the connection string the registration statement reads.
pub const CONNECTION_STRING_NAME: &str = "DefaultConnection";

/// Everything the wiring step needs to know about one provider.
#[derive(Debug, Clone, Copy)]
pub struct ProviderDef {
    pub provider: Provider,

    /// NuGet package carrying the EF Core provider.
    pub package: &'static str,

    /// Package version; Oracle ships on its own cadence.
    pub version: &'static str,

    /// `DbContextOptionsBuilder` extension that selects the provider.
    pub options_call: &'static str,
}

pub static PROVIDER_REGISTRY: &[ProviderDef] = &[
    ProviderDef {
        provider: Provider::PostgreSql,
        package: "Npgsql.EntityFrameworkCore.PostgreSQL",
        version: EF_CORE_VERSION,
        options_call: "UseNpgsql",
    },
    ProviderDef {
        provider: Provider::SqlServer,
        package: "Microsoft.EntityFrameworkCore.SqlServer",
        version: EF_CORE_VERSION,
        options_call: "UseSqlServer",
    },
    ProviderDef {
        provider: Provider::Oracle,
        package: "Oracle.EntityFrameworkCore",
        version: "8.23.50",
        options_call: "UseOracle",
    },
];

/// Look up the definition for a provider.
///
/// Every `Provider` variant has an entry; the registry test enforces that.
pub fn find_provider(provider: Provider) -> &'static ProviderDef {
    PROVIDER_REGISTRY
        .iter()
        .find(|def| def.provider == provider)
        .unwrap_or(&PROVIDER_REGISTRY[0])
}

impl ProviderDef {
    /// The `<PackageReference … />` line placed between the provider tags.
    pub fn reference_line(&self) -> String {
        format!(
            r#"<PackageReference Include="{}" Version="{}" />"#,
            self.package, self.version
        )
    }

    /// The `AddDbContext` statement placed between the registration tags.
    pub fn registration_statement(&self) -> String {
        format!(
            r#"builder.Services.AddDbContext<AppDbContext>(options => options.{}(builder.Configuration.GetConnectionString("{}")));"#,
            self.options_call, CONNECTION_STRING_NAME
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_provider_has_a_definition() {
        for provider in Provider::ALL {
            assert_eq!(find_provider(provider).provider, provider);
        }
    }

    #[test]
    fn provider_text_is_distinct() {
        let pg = find_provider(Provider::PostgreSql);
        let sql = find_provider(Provider::SqlServer);

        assert!(pg.reference_line().contains("Npgsql"));
        assert!(pg.registration_statement().contains("UseNpgsql"));
        assert!(!sql.reference_line().contains("Npgsql"));
        assert!(sql.registration_statement().contains("UseSqlServer"));
    }
}
