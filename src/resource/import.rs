//! Import identifier resolution
//!
//! An import identifier is either a bare group UUID or
//! `<organization name>/<group name>`. Names are looked up remotely; a
//! malformed identifier, including one whose names break the naming
//! rules, is rejected before any call.

use groupkit::Backend;
use uuid::Uuid;

use super::error::ReconcileError;
use crate::schema::is_valid_name;

/// A parsed import identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifier<'a> {
    /// Canonical group ID
    Id(Uuid),
    /// Organization and group name
    Qualified { organization: &'a str, name: &'a str },
}

impl<'a> Identifier<'a> {
    /// Parse an identifier without touching the network
    pub fn parse(identifier: &'a str) -> Result<Self, ReconcileError> {
        let malformed = |reason: &str| ReconcileError::MalformedIdentifier {
            identifier: identifier.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = identifier.split('/').collect();
        match parts.as_slice() {
            &[id] => Uuid::parse_str(id)
                .map(Identifier::Id)
                .map_err(|e| malformed(&format!("not a UUID ({e})"))),
            &[organization, name] => {
                if organization.is_empty() {
                    return Err(malformed("organization name is empty"));
                }
                if name.is_empty() {
                    return Err(malformed("group name is empty"));
                }
                if !is_valid_name(organization) {
                    return Err(malformed(&format!(
                        "{organization:?} is not a valid organization name"
                    )));
                }
                if !is_valid_name(name) {
                    return Err(malformed(&format!("{name:?} is not a valid group name")));
                }
                Ok(Identifier::Qualified { organization, name })
            }
            _ => Err(malformed("expected a UUID or <organization>/<group>")),
        }
    }
}

/// Resolve an identifier to a group ID
///
/// A bare UUID resolves without any call. A qualified name costs one
/// organization lookup and, only if that succeeds, one group lookup.
pub fn resolve(client: &dyn Backend, identifier: &str) -> Result<Uuid, ReconcileError> {
    match Identifier::parse(identifier)? {
        Identifier::Id(id) => Ok(id),
        Identifier::Qualified { organization, name } => {
            let org = client.organization_by_name(organization).map_err(|e| {
                if e.is_not_found() {
                    ReconcileError::OrganizationNotFound {
                        name: organization.to_string(),
                    }
                } else {
                    ReconcileError::remote("look up organization")(e)
                }
            })?;

            let group = client.group_by_org_and_name(org.id, name).map_err(|e| {
                if e.is_not_found() {
                    ReconcileError::EntityNotFound {
                        identifier: identifier.to_string(),
                    }
                } else {
                    ReconcileError::remote("look up group")(e)
                }
            })?;

            log::debug!("Resolved {identifier} to group {}", group.id);
            Ok(group.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupkit::{MockBackend, MockCall};

    #[test]
    fn test_parse_bare_uuid() {
        let id = Uuid::new_v4();
        let text = id.to_string();
        assert_eq!(Identifier::parse(&text).unwrap(), Identifier::Id(id));
    }

    #[test]
    fn test_parse_qualified() {
        assert_eq!(
            Identifier::parse("acme/devs").unwrap(),
            Identifier::Qualified {
                organization: "acme",
                name: "devs"
            }
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "not-a-uuid", "a/b/c", "acme/", "/devs", "/"] {
            let err = Identifier::parse(bad).unwrap_err();
            assert!(
                matches!(err, ReconcileError::MalformedIdentifier { .. }),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_names_unsafe_in_urls() {
        for bad in ["acme/devs?x", "acme/dev s", "acme/devs#top", "ac%2Fme/devs"] {
            let err = Identifier::parse(bad).unwrap_err();
            assert!(
                matches!(err, ReconcileError::MalformedIdentifier { .. }),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_resolve_bare_uuid_makes_no_calls() {
        let mock = MockBackend::new();
        let id = Uuid::new_v4();

        assert_eq!(resolve(&mock, &id.to_string()).unwrap(), id);
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_resolve_qualified_name() {
        let mock = MockBackend::new();
        let org = mock.add_organization("acme", true);
        let group = mock.seed_group(org.id, "devs", &[]);

        assert_eq!(resolve(&mock, "acme/devs").unwrap(), group.id);
        assert_eq!(
            mock.calls(),
            vec![
                MockCall::OrganizationByName("acme".into()),
                MockCall::GroupByOrgAndName {
                    organization_id: org.id,
                    name: "devs".into()
                },
            ]
        );
    }

    #[test]
    fn test_resolve_unknown_organization_stops_early() {
        let mock = MockBackend::new();

        let err = resolve(&mock, "ghost/devs").unwrap_err();
        assert!(matches!(err, ReconcileError::OrganizationNotFound { ref name } if name == "ghost"));
        assert_eq!(mock.calls(), vec![MockCall::OrganizationByName("ghost".into())]);
    }

    #[test]
    fn test_resolve_unknown_group() {
        let mock = MockBackend::new();
        mock.add_organization("acme", true);

        let err = resolve(&mock, "acme/ghosts").unwrap_err();
        assert!(matches!(err, ReconcileError::EntityNotFound { .. }));
        assert_eq!(mock.calls().len(), 2);
    }

    #[test]
    fn test_resolve_malformed_makes_no_calls() {
        let mock = MockBackend::new();

        assert!(resolve(&mock, "a/b/c").is_err());
        assert!(resolve(&mock, "acme/").is_err());
        assert!(resolve(&mock, "acme/devs?x").is_err());
        assert!(resolve(&mock, "acme/dev s").is_err());
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_resolve_wraps_transport_errors() {
        let mock = MockBackend::new();
        mock.fail_on("organization_by_name", 503, "unavailable");

        let err = resolve(&mock, "acme/devs").unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::RemoteOperationFailed {
                operation: "look up organization",
                ..
            }
        ));
    }
}
