// src/models/access.rs

use std::{
    collections::BTreeSet,
    fmt,
};

use serde::{Serialize, Serializer};

use crate::models::tenancy::{BusinessId, LocationId};

const ACCESS_ALL_LOCATIONS: &str = "access_all_locations";
const SUPERADMIN: &str = "superadmin";
const BUSINESS_ADMIN_PREFIX: &str = "Admin#";
const LOCATION_PREFIX: &str = "location.";

// ---
// Capacidades tipadas
// ---
// No banco as permissões são apenas nomes (ex: "location.3", "Admin#7").
// Elas são convertidas uma única vez na borda; daqui para dentro só
// trabalhamos com as variantes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    AccessAllLocations,
    Superadmin,
    BusinessAdmin(BusinessId),
    Location(LocationId),
    Named(String),
}

impl Capability {
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name == ACCESS_ALL_LOCATIONS {
            return Capability::AccessAllLocations;
        }
        if name == SUPERADMIN {
            return Capability::Superadmin;
        }
        if let Some(id) = name
            .strip_prefix(BUSINESS_ADMIN_PREFIX)
            .and_then(|rest| rest.parse::<BusinessId>().ok())
        {
            return Capability::BusinessAdmin(id);
        }
        if let Some(id) = name
            .strip_prefix(LOCATION_PREFIX)
            .and_then(|rest| rest.parse::<LocationId>().ok())
        {
            return Capability::Location(id);
        }
        Capability::Named(name.to_string())
    }
}

impl From<&str> for Capability {
    fn from(name: &str) -> Self {
        Capability::parse(name)
    }
}

// Volta para o nome armazenado, usado nas subconsultas de permissão.
impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::AccessAllLocations => f.write_str(ACCESS_ALL_LOCATIONS),
            Capability::Superadmin => f.write_str(SUPERADMIN),
            Capability::BusinessAdmin(id) => write!(f, "{BUSINESS_ADMIN_PREFIX}{id}"),
            Capability::Location(id) => write!(f, "{LOCATION_PREFIX}{id}"),
            Capability::Named(name) => f.write_str(name),
        }
    }
}

/// Capacidades efetivas de um ator (diretas + herdadas dos cargos).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    caps: BTreeSet<Capability>,
}

impl CapabilitySet {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            caps: names.into_iter().map(|n| Capability::parse(n.as_ref())).collect(),
        }
    }

    pub fn contains(&self, cap: &Capability) -> bool {
        self.caps.contains(cap)
    }

    pub fn access_all_locations(&self) -> bool {
        self.contains(&Capability::AccessAllLocations)
    }

    pub fn is_superadmin(&self) -> bool {
        self.contains(&Capability::Superadmin)
    }

    pub fn is_business_admin(&self, business_id: BusinessId) -> bool {
        self.contains(&Capability::BusinessAdmin(business_id))
    }

    /// IDs de `location.<id>` concedidos, sem filtrar por empresa.
    pub fn granted_locations(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.caps.iter().filter_map(|cap| match cap {
            Capability::Location(id) => Some(*id),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.caps.iter()
    }

    pub fn len(&self) -> usize {
        self.caps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caps.is_empty()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
        Self { caps: iter.into_iter().collect() }
    }
}

impl Serialize for CapabilitySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.caps.iter().map(ToString::to_string))
    }
}

// ---
// Visibilidade de locais
// ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationAccess {
    All,
    Only(BTreeSet<LocationId>),
}

impl LocationAccess {
    pub fn allows(&self, location_id: LocationId) -> bool {
        match self {
            LocationAccess::All => true,
            LocationAccess::Only(ids) => ids.contains(&location_id),
        }
    }
}

// "all" ou a lista de IDs, o formato que o frontend já espera.
impl Serialize for LocationAccess {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LocationAccess::All => serializer.serialize_str("all"),
            LocationAccess::Only(ids) => serializer.collect_seq(ids.iter()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_reserved_names() {
        assert_eq!(Capability::parse("access_all_locations"), Capability::AccessAllLocations);
        assert_eq!(Capability::parse("superadmin"), Capability::Superadmin);
        assert_eq!(Capability::parse("Admin#7"), Capability::BusinessAdmin(7));
        assert_eq!(Capability::parse("location.12"), Capability::Location(12));
    }

    #[test]
    fn malformed_patterns_stay_named() {
        assert_eq!(Capability::parse("Admin#"), Capability::Named("Admin#".into()));
        assert_eq!(Capability::parse("location.abc"), Capability::Named("location.abc".into()));
        assert_eq!(Capability::parse("sell.create"), Capability::Named("sell.create".into()));
    }

    #[test]
    fn display_round_trips_the_stored_name() {
        for name in ["access_all_locations", "superadmin", "Admin#3", "location.9", "user.view"] {
            assert_eq!(Capability::parse(name).to_string(), name);
        }
    }

    #[test]
    fn set_answers_blanket_checks() {
        let caps = CapabilitySet::from_names(["Admin#4", "location.1", "location.2"]);
        assert!(!caps.access_all_locations());
        assert!(!caps.is_superadmin());
        assert!(caps.is_business_admin(4));
        assert!(!caps.is_business_admin(5));
        assert_eq!(caps.granted_locations().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn location_access_serializes_like_the_frontend_expects() {
        assert_eq!(serde_json::to_value(LocationAccess::All).unwrap(), json!("all"));
        let only = LocationAccess::Only([3, 1].into_iter().collect());
        assert_eq!(serde_json::to_value(only).unwrap(), json!([1, 3]));
    }
}
