use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Package-style import identifier for the schema-paths module.
pub const SCHEMA_MODULE_ID: &str = "openapi-vmod/schema-paths";
/// `virtual:`-prefixed alias for the schema-paths module.
pub const VIRTUAL_SCHEMA_MODULE_ID: &str = "virtual:openapi-vmod/schema-paths";
/// Internal resolved id for the schema-paths module (`\0` prefix keeps other
/// plugins and the filesystem resolver away from it).
pub const RESOLVED_SCHEMA_MODULE_ID: &str = "\0virtual:openapi-vmod/schema-paths";

/// Package-style import identifier for the validation-registry module.
pub const VALIDATION_MODULE_ID: &str = "openapi-vmod/schema-validation-map";
/// `virtual:`-prefixed alias for the validation-registry module.
pub const VIRTUAL_VALIDATION_MODULE_ID: &str = "virtual:openapi-vmod/schema-validation-map";
/// Internal resolved id for the validation-registry module.
pub const RESOLVED_VALIDATION_MODULE_ID: &str = "\0virtual:openapi-vmod/schema-validation-map";

/// The two virtual module surfaces served by this crate.
///
/// Each module is importable under a package-style name or a `virtual:`
/// alias; both forms resolve to the same internal id. Resolution is a pure
/// lookup and never triggers generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualModuleId {
    /// The OpenAPI paths document, exported as a literal value.
    SchemaPaths,
    /// The lazily-initialized request-validation registry.
    ValidationRegistry,
}

impl VirtualModuleId {
    /// Both virtual modules, in the order they are invalidated.
    pub const ALL: [VirtualModuleId; 2] = [
        VirtualModuleId::SchemaPaths,
        VirtualModuleId::ValidationRegistry,
    ];

    /// Map a public import identifier (package name or `virtual:` alias) to
    /// the matching module, or `None` for any id this crate does not serve.
    pub fn resolve(id: &str) -> Option<Self> {
        match id {
            SCHEMA_MODULE_ID | VIRTUAL_SCHEMA_MODULE_ID => Some(VirtualModuleId::SchemaPaths),
            VALIDATION_MODULE_ID | VIRTUAL_VALIDATION_MODULE_ID => {
                Some(VirtualModuleId::ValidationRegistry)
            }
            _ => None,
        }
    }

    /// Map an internal resolved id back to the matching module.
    pub fn from_resolved(id: &str) -> Option<Self> {
        match id {
            RESOLVED_SCHEMA_MODULE_ID => Some(VirtualModuleId::SchemaPaths),
            RESOLVED_VALIDATION_MODULE_ID => Some(VirtualModuleId::ValidationRegistry),
            _ => None,
        }
    }

    /// The internal resolved id handed back to the host's resolver.
    pub fn resolved_id(&self) -> &'static str {
        match self {
            VirtualModuleId::SchemaPaths => RESOLVED_SCHEMA_MODULE_ID,
            VirtualModuleId::ValidationRegistry => RESOLVED_VALIDATION_MODULE_ID,
        }
    }

    /// The package-style public identifier.
    pub fn package_id(&self) -> &'static str {
        match self {
            VirtualModuleId::SchemaPaths => SCHEMA_MODULE_ID,
            VirtualModuleId::ValidationRegistry => VALIDATION_MODULE_ID,
        }
    }
}

impl Display for VirtualModuleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.package_id())
    }
}

/// Parse error for [`VirtualModuleId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModuleId(pub String);

impl Display for UnknownModuleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown virtual module id: {}", self.0)
    }
}

impl std::error::Error for UnknownModuleId {}

impl FromStr for VirtualModuleId {
    type Err = UnknownModuleId;

    /// Accepts any of the three forms (package name, `virtual:` alias,
    /// resolved id).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VirtualModuleId::resolve(s)
            .or_else(|| VirtualModuleId::from_resolved(s))
            .ok_or_else(|| UnknownModuleId(s.to_string()))
    }
}
