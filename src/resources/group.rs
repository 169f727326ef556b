//! Group data source

use crate::resolver::resolve;
use anyhow::Result;
use catalog::{Client, Error, Group, Identifier, Team, User};
use declarative::{AttrValue, Attributes, LocalState, Reconciler, ReconcilerKind};

pub const TYPE_NAME: &str = "group";

/// Id or alias of the group to read
pub const IDENTIFIER: &str = "identifier";

pub const ALIAS: &str = "alias";
pub const NAME: &str = "name";
pub const DESCRIPTION: &str = "description";
pub const PARENT: &str = "parent";
pub const MEMBERS: &str = "members";
pub const TEAMS: &str = "teams";

/// Project a group with its members (as emails) and child teams (as aliases)
pub fn to_attributes(group: &Group, members: &[User], teams: &[Team]) -> Attributes {
    let parent = group.parent.as_ref().map_or("", |p| p.alias.as_str());
    Attributes::from([
        (ALIAS.to_string(), AttrValue::from(group.alias.as_str())),
        (NAME.to_string(), AttrValue::from(group.name.as_str())),
        (
            DESCRIPTION.to_string(),
            AttrValue::from(group.description.as_str()),
        ),
        (PARENT.to_string(), AttrValue::from(parent)),
        (
            MEMBERS.to_string(),
            AttrValue::from(members.iter().map(|m| m.email.clone()).collect::<Vec<_>>()),
        ),
        (
            TEAMS.to_string(),
            AttrValue::from(teams.iter().map(|t| t.alias.clone()).collect::<Vec<_>>()),
        ),
    ])
}

#[derive(Debug, Clone)]
pub struct GroupDataSource {
    client: Client,
}

impl GroupDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Reconciler for GroupDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn kind(&self) -> ReconcilerKind {
        ReconcilerKind::DataSource
    }

    fn read(&self, state: &mut LocalState) -> Result<()> {
        let identifier = state.get_str(IDENTIFIER);
        if identifier.is_empty() {
            return Err(Error::configuration(format!(
                "`{IDENTIFIER}` must be set to read a group"
            ))
            .into());
        }

        let group: Group = resolve(&self.client, &Identifier::parse(identifier))?;
        let members = self.client.group_members(&group.id)?;
        let teams = self.client.group_child_teams(&group.id)?;

        state.set_id(&group.id);
        state.apply_remote(to_attributes(&group, &members, &teams));
        Ok(())
    }
}
